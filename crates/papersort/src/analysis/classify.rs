//! Taxonomy classification through the language model.

use super::*;

/// Classification reply schema. Unknown keys are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassification {
  labels:     Vec<String>,
  confidence: f64,
}

/// Builds the instructions for a taxonomy.
fn classification_prompt(taxonomy: &Taxonomy) -> String {
  format!(
    "Analyze the following text and return the most relevant domain labels, chosen only from \
     this taxonomy ({taxonomy}), most relevant first, together with your confidence between 0 \
     and 1. Reply with a single JSON object and nothing else, using exactly these keys: \
     {{\"labels\": [], \"confidence\": 0.0}}"
  )
}

/// Parses a classification reply and checks it against `taxonomy`.
///
/// Repeated labels are collapsed; unknown labels, an empty label list, and a
/// confidence outside `[0, 1]` are rejected.
///
/// ```
/// use papersort::{analysis::parse_classification, config::Taxonomy};
///
/// let taxonomy = Taxonomy::default();
/// let classification =
///   parse_classification(r#"{"labels": ["Medical_AI"], "confidence": 0.91}"#, &taxonomy).unwrap();
/// assert_eq!(classification.directory_name(), "Medical_AI");
///
/// assert!(parse_classification(r#"{"labels": ["Astrology"], "confidence": 0.9}"#, &taxonomy).is_err());
/// ```
pub fn parse_classification(reply: &str, taxonomy: &Taxonomy) -> Result<ClassificationRecord> {
  let raw: RawClassification = parse_model_json(reply)?;

  let mut labels: Vec<String> = Vec::with_capacity(raw.labels.len());
  for label in raw.labels {
    let label = label.trim().to_string();
    if !taxonomy.contains(&label) {
      return Err(PapersortError::MalformedModelOutput(format!(
        "label {label:?} is not part of the taxonomy"
      )));
    }
    if labels.contains(&label) {
      debug!("Dropping repeated label {label}");
      continue;
    }
    labels.push(label);
  }

  if labels.is_empty() {
    return Err(PapersortError::MalformedModelOutput("classification has no labels".into()));
  }
  if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
    return Err(PapersortError::MalformedModelOutput(format!(
      "confidence {} is outside [0, 1]",
      raw.confidence
    )));
  }

  Ok(ClassificationRecord { labels, confidence: raw.confidence })
}

/// [`Classifier`] asking a chat model to pick taxonomy labels for a PDF.
#[derive(Debug, Clone)]
pub struct LlmClassifier {
  /// Model connection
  client:    LlmClient,
  /// Pages of text included in the prompt
  max_pages: usize,
  /// Labels the model may choose from
  taxonomy:  Taxonomy,
}

impl LlmClassifier {
  /// Creates a classifier reading `config.classification_pages` pages per
  /// document and constrained to `config.taxonomy`.
  pub fn new(client: LlmClient, config: &Config) -> Self {
    Self { client, max_pages: config.classification_pages, taxonomy: config.taxonomy.clone() }
  }
}

#[async_trait]
impl Classifier for LlmClassifier {
  async fn classify(&self, document: &Path) -> Result<ClassificationRecord> {
    let text = document_prefix(document, self.max_pages)?;
    let request = self
      .client
      .request()
      .with_system(&classification_prompt(&self.taxonomy))
      .with_message(&text)
      .with_json_mode();
    let reply = self.client.complete(&request).await?;
    parse_classification(&reply, &self.taxonomy)
  }
}
