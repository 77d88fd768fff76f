//! Model-backed collaborators and the parsing of their output.
//!
//! The pipeline only depends on three traits:
//!
//! - [`MetadataExtractor`]: document → [`MetadataRecord`]
//! - [`Classifier`]: document → [`ClassificationRecord`]
//! - [`Summarizer`]: document → [`PaperSummary`]
//!
//! The `Llm*` implementations read a bounded prefix of the PDF, ask the
//! configured model for a JSON object, and parse the reply.
//!
//! # Model output is untrusted
//!
//! A reply is never evaluated. It goes through three steps, and failing any of
//! them yields [`PapersortError::MalformedModelOutput`]:
//!
//! 1. Locate the JSON object (a fenced ```` ```json ```` block, a plain fenced block, or the span
//!    from the first `{` to the last `}`).
//! 2. Deserialize it into a fixed schema that rejects unknown fields.
//! 3. Validate the values (labels in the taxonomy, confidence in range, ...).

use serde::de::DeserializeOwned;

use super::*;
use crate::{config::Taxonomy, llm::LlmClient, pdf::PdfText};

mod classify;
mod metadata;
mod summary;

pub use classify::{parse_classification, LlmClassifier};
pub use metadata::{parse_metadata, LlmMetadataExtractor};
pub use summary::{parse_summary, LlmSummarizer};

/// Produces bibliographic metadata for a document.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
  /// Extracts metadata from the document at `document`.
  ///
  /// Any error means "no usable record"; the organizer skips the document.
  async fn extract(&self, document: &Path) -> Result<MetadataRecord>;
}

/// Assigns taxonomy labels to a document.
#[async_trait]
pub trait Classifier: Send + Sync {
  /// Classifies the document at `document`.
  async fn classify(&self, document: &Path) -> Result<ClassificationRecord>;
}

/// Produces a structured summary of a document.
#[async_trait]
pub trait Summarizer: Send + Sync {
  /// Summarizes the document at `document`.
  async fn summarize(&self, document: &Path) -> Result<PaperSummary>;
}

/// Finds the JSON object inside a model reply.
///
/// ```
/// use papersort::analysis::extract_json_object;
///
/// let reply = "Sure! Here it is:\n```json\n{\"year\": \"2022\"}\n```";
/// assert_eq!(extract_json_object(reply), Some("{\"year\": \"2022\"}"));
/// assert_eq!(extract_json_object("no json here"), None);
/// ```
pub fn extract_json_object(reply: &str) -> Option<&str> {
  if let Some(start) = reply.find("```json") {
    let body = &reply[start + "```json".len()..];
    if let Some(end) = body.find("```") {
      return Some(body[..end].trim());
    }
  }

  if let Some(start) = reply.find("```") {
    let after_fence = &reply[start + 3..];
    let body = after_fence.find('\n').map_or(after_fence, |newline| &after_fence[newline + 1..]);
    if let Some(end) = body.find("```") {
      let candidate = body[..end].trim();
      if candidate.starts_with('{') {
        return Some(candidate);
      }
    }
  }

  let start = reply.find('{')?;
  let end = reply.rfind('}')?;
  (start < end).then(|| &reply[start..=end])
}

/// Locates and deserializes the JSON object in `reply` into `T`.
pub(crate) fn parse_model_json<T: DeserializeOwned>(reply: &str) -> Result<T> {
  let json = extract_json_object(reply)
    .ok_or_else(|| PapersortError::MalformedModelOutput(format!("no JSON object in {reply:?}")))?;
  serde_json::from_str(json).map_err(|e| {
    PapersortError::MalformedModelOutput(format!("{e} in {}", abbreviate(json, 200)))
  })
}

/// Reads the leading pages of a PDF for a model prompt.
///
/// Reading is synchronous; documents are handled one at a time anyway.
pub(crate) fn document_prefix(document: &Path, max_pages: usize) -> Result<String> {
  let prefix = PdfText::extract_prefix(document, max_pages)?;
  debug!("Read {} of {} page(s) from {document:?}", prefix.pages_read, prefix.total_pages);
  Ok(prefix.text)
}

/// Shortens `text` to at most `max_chars` characters for error messages.
fn abbreviate(text: &str, max_chars: usize) -> String {
  match text.char_indices().nth(max_chars) {
    Some((index, _)) => format!("{}...", &text[..index]),
    None => text.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_json_object_variants() {
    assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    assert_eq!(extract_json_object("```json\n{\"a\": 1}\n```"), Some(r#"{"a": 1}"#));
    assert_eq!(extract_json_object("```\n{\"a\": 1}\n```"), Some(r#"{"a": 1}"#));
    assert_eq!(
      extract_json_object("The answer is {\"a\": {\"b\": 2}} as requested."),
      Some(r#"{"a": {"b": 2}}"#)
    );
    assert_eq!(extract_json_object("} backwards {"), None);
    assert_eq!(extract_json_object(""), None);
  }

  #[test]
  fn test_parse_model_json_fails_closed() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Probe {
      a: u32,
    }

    assert!(parse_model_json::<Probe>(r#"{"a": 1}"#).is_ok());
    for reply in [
      "",
      "I could not find anything.",
      "{'a': 1}",
      r#"{"a": "one"}"#,
      "__import__('os').system('rm -rf /')",
    ] {
      assert!(
        matches!(parse_model_json::<Probe>(reply), Err(PapersortError::MalformedModelOutput(_))),
        "accepted {reply:?}"
      );
    }
  }

  #[test]
  fn test_abbreviate() {
    assert_eq!(abbreviate("short", 10), "short");
    assert_eq!(abbreviate("ünïcödé", 3), "ünï...");
  }
}
