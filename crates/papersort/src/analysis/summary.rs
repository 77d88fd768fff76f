//! Structured paper summaries through the language model.

use super::*;

/// Instructions sent ahead of the paper text.
const SUMMARY_PROMPT: &str = "Summarize the following paper. Reply with a single JSON object and \
                              nothing else, using exactly these keys: {\"summary\": \"core \
                              conclusions in one paragraph\", \"methods\": \"research methods\", \
                              \"contributions\": \"key contributions\", \"references\": \"closely \
                              related literature\"}";

/// Summary reply schema. Unknown keys are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSummary {
  summary:       String,
  methods:       String,
  contributions: String,
  references:    TextOrList,
}

/// References tend to come back as a list even when asked for prose.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrList {
  Text(String),
  List(Vec<String>),
}

impl TextOrList {
  fn into_text(self) -> String {
    match self {
      Self::Text(text) => text,
      Self::List(items) => items.join("; "),
    }
  }
}

/// Parses and validates a summary reply. The `summary` field must not be blank.
pub fn parse_summary(reply: &str) -> Result<PaperSummary> {
  let raw: RawSummary = parse_model_json(reply)?;
  let summary = raw.summary.trim().to_string();
  if summary.is_empty() {
    return Err(PapersortError::MalformedModelOutput("summary is empty".into()));
  }
  Ok(PaperSummary {
    summary,
    methods: raw.methods.trim().to_string(),
    contributions: raw.contributions.trim().to_string(),
    references: raw.references.into_text().trim().to_string(),
  })
}

/// [`Summarizer`] sending the full text of a PDF, cut to a word budget.
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
  /// Model connection
  client:    LlmClient,
  /// Words of paper text included in the prompt
  max_words: usize,
}

impl LlmSummarizer {
  /// Creates a summarizer sending at most `config.summary_word_limit` words.
  pub fn new(client: LlmClient, config: &Config) -> Self {
    Self { client, max_words: config.summary_word_limit }
  }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
  async fn summarize(&self, document: &Path) -> Result<PaperSummary> {
    let text = PdfText::extract_all(document)?.truncated_words(self.max_words);
    let request =
      self.client.request().with_system(SUMMARY_PROMPT).with_message(&text).with_json_mode();
    let reply = self.client.complete(&request).await?;
    parse_summary(&reply)
  }
}
