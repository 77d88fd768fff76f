//! Metadata extraction through the language model.

use super::*;

/// Instructions sent ahead of the document text.
const METADATA_PROMPT: &str = "Extract the paper's title, its authors (at most the first three, \
                               in the order listed), and its publication year from the following \
                               text. Reply with a single JSON object and nothing else, using \
                               exactly these keys: {\"title\": \"\", \"authors\": [], \"year\": \
                               \"\", \"language\": \"EN\"}";

/// Metadata reply schema. Unknown keys are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMetadata {
  title:    String,
  authors:  Vec<String>,
  year:     RawYear,
  #[serde(default)]
  language: Option<String>,
}

/// Models report years both as strings and as bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawYear {
  Text(String),
  Number(u32),
}

impl RawYear {
  fn into_string(self) -> String {
    match self {
      Self::Text(year) => year.trim().to_string(),
      Self::Number(year) => year.to_string(),
    }
  }
}

/// Parses and validates a metadata reply.
///
/// Blank author entries are dropped. A reply with no title, no authors, and no
/// year carries nothing to name the file after and is rejected.
///
/// ```
/// use papersort::analysis::parse_metadata;
///
/// let reply = r#"{"title": "Attention Is All You Need", "authors": ["Ashish Vaswani"], "year": 2017}"#;
/// let metadata = parse_metadata(reply).unwrap();
/// assert_eq!(metadata.year, "2017");
/// assert_eq!(metadata.language, "EN");
///
/// assert!(parse_metadata("{'title': 'eval me'}").is_err());
/// ```
pub fn parse_metadata(reply: &str) -> Result<MetadataRecord> {
  let raw: RawMetadata = parse_model_json(reply)?;

  let title = raw.title.trim().to_string();
  let authors: Vec<String> = raw
    .authors
    .into_iter()
    .map(|author| author.trim().to_string())
    .filter(|author| !author.is_empty())
    .collect();
  let year = raw.year.into_string();

  if title.is_empty() && authors.is_empty() && year.is_empty() {
    return Err(PapersortError::ExtractionFailure("model returned an empty metadata record".into()));
  }

  let language = raw
    .language
    .map(|language| language.trim().to_string())
    .filter(|language| !language.is_empty())
    .unwrap_or_else(|| "EN".to_string());

  Ok(MetadataRecord { title, authors, year, language })
}

/// [`MetadataExtractor`] asking a chat model about the first pages of a PDF.
#[derive(Debug, Clone)]
pub struct LlmMetadataExtractor {
  /// Model connection
  client:    LlmClient,
  /// Pages of text included in the prompt
  max_pages: usize,
}

impl LlmMetadataExtractor {
  /// Creates an extractor reading `config.metadata_pages` pages per document.
  pub fn new(client: LlmClient, config: &Config) -> Self {
    Self { client, max_pages: config.metadata_pages }
  }
}

#[async_trait]
impl MetadataExtractor for LlmMetadataExtractor {
  async fn extract(&self, document: &Path) -> Result<MetadataRecord> {
    let text = document_prefix(document, self.max_pages)?;
    let request =
      self.client.request().with_system(METADATA_PROMPT).with_message(&text).with_json_mode();
    let reply = self.client.complete(&request).await?;
    parse_metadata(&reply)
  }
}
