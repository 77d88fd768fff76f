//! Deterministic filenames built from paper metadata.
//!
//! A filename has three parts joined by `_`:
//!
//! 1. The first author's surname (last whitespace token), with `_etal` when there are co-authors,
//!    or `Unknown` when no author is known.
//! 2. The year as reported.
//! 3. Up to three title words with stop words removed, joined by `-` and capped at 30 characters.
//!
//! ```
//! use papersort::{naming::FilenameBuilder, record::MetadataRecord};
//!
//! let metadata = MetadataRecord::new("The Effects of Noise", ["Jane A. Smith", "Bob Lee"], "2022");
//! assert_eq!(FilenameBuilder::default().build(&metadata), "Smith_etal_2022_Effects-Noise.pdf");
//! ```

use super::*;

/// Author component used when a paper has no usable author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Title component used when nothing is left of the title after cleaning.
pub const UNTITLED: &str = "untitled";

/// Year component used when the year is blank.
pub const NO_DATE: &str = "nd";

/// Maximum length of the title component.
pub const TITLE_COMPONENT_MAX_LEN: usize = 30;

/// Number of title words kept in the title component.
const TITLE_WORDS: usize = 3;

lazy_static! {
  /// Whole-word, case-insensitive stop words dropped from titles.
  static ref STOP_WORDS: Regex =
    Regex::new(r"(?i)\b(?:a|an|the|investigation|of|on|in|at|to)\b").unwrap();
  /// Everything that is not an ASCII letter, ASCII digit, whitespace, or hyphen.
  static ref NOT_TITLE_CHAR: Regex = Regex::new(r"[^a-zA-Z0-9\s-]").unwrap();
}

/// Builds candidate filenames from [`MetadataRecord`]s.
///
/// The builder only knows the extension to append; everything else is a pure
/// function of the metadata.
#[derive(Debug, Clone)]
pub struct FilenameBuilder {
  /// Extension without the leading dot
  extension: String,
}

impl Default for FilenameBuilder {
  fn default() -> Self { Self::new("pdf") }
}

impl FilenameBuilder {
  /// Creates a builder appending `extension` (given without a leading dot).
  pub fn new(extension: &str) -> Self {
    Self { extension: extension.trim_start_matches('.').to_string() }
  }

  /// Builds `{author}_{year}_{title}.{ext}` for the given metadata.
  pub fn build(&self, metadata: &MetadataRecord) -> String {
    format!(
      "{}_{}_{}.{}",
      author_component(&metadata.authors),
      year_component(&metadata.year),
      title_component(&metadata.title),
      self.extension
    )
  }
}

/// Surname of the first author, suffixed with `_etal` when co-authors exist.
///
/// Falls back to [`UNKNOWN_AUTHOR`] when the list is empty or the first name
/// has nothing left after dropping characters that cannot appear in a filename.
pub fn author_component(authors: &[String]) -> String {
  let surname = authors
    .first()
    .and_then(|first| first.split_whitespace().last())
    .map(strip_unsafe_chars)
    .filter(|surname| !surname.is_empty())
    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

  if authors.len() > 1 {
    format!("{surname}_etal")
  } else {
    surname
  }
}

/// Up to three cleaned title words joined by `-`, at most 30 characters.
pub fn title_component(title: &str) -> String {
  let without_stop_words = STOP_WORDS.replace_all(title, "");
  let cleaned = NOT_TITLE_CHAR.replace_all(&without_stop_words, "");
  let joined = cleaned.split_whitespace().take(TITLE_WORDS).collect::<Vec<_>>().join("-");
  // Only ASCII survives the cleaning step, so byte and char lengths agree.
  let truncated: String = joined.chars().take(TITLE_COMPONENT_MAX_LEN).collect();

  if truncated.is_empty() {
    UNTITLED.to_string()
  } else {
    truncated
  }
}

/// The year with whitespace and filename-unsafe characters removed.
pub fn year_component(year: &str) -> String {
  let cleaned: String = strip_unsafe_chars(year).split_whitespace().collect();
  if cleaned.is_empty() {
    NO_DATE.to_string()
  } else {
    cleaned
  }
}

/// Drops path separators, characters reserved on common filesystems, and
/// control characters.
fn strip_unsafe_chars(value: &str) -> String {
  value
    .chars()
    .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
    .filter(|c| !c.is_control())
    .collect()
}
