//! Records exchanged between the pipeline stages.
//!
//! [`MetadataRecord`] and [`ClassificationRecord`] come out of the model
//! collaborators, [`ReportRow`] goes into the report, and [`PaperSummary`]
//! feeds the notes pipeline. All of them are plain immutable values once built.

use super::*;

/// Sentinel written in the warnings column when a document raised none.
pub const NO_WARNINGS: &str = "none";

/// Bibliographic facts extracted from a single paper.
///
/// # Examples
///
/// ```
/// use papersort::record::MetadataRecord;
///
/// let metadata = MetadataRecord::new("The Effects of Noise", ["Jane A. Smith", "Bob Lee"], "2022");
/// assert_eq!(metadata.first_author(), Some("Jane A. Smith"));
/// assert_eq!(metadata.language, "EN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
  /// Paper title as printed
  pub title:    String,
  /// Author names, first author first
  pub authors:  Vec<String>,
  /// Publication year, kept as the model reported it
  pub year:     String,
  /// Language code of the paper
  pub language: String,
}

impl MetadataRecord {
  /// Builds a record with the default `EN` language.
  pub fn new<I, S>(title: &str, authors: I, year: &str) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>, {
    Self {
      title:    title.to_string(),
      authors:  authors.into_iter().map(Into::into).collect(),
      year:     year.to_string(),
      language: "EN".to_string(),
    }
  }

  /// Overrides the language code.
  pub fn with_language(mut self, language: &str) -> Self {
    self.language = language.to_string();
    self
  }

  /// The first listed author, if any.
  pub fn first_author(&self) -> Option<&str> { self.authors.first().map(String::as_str) }
}

/// Taxonomy labels plus the model's confidence in them.
///
/// The label order is meaningful: it decides both the directory name
/// (`Medical_AI_Experimental`) and the report path (`Medical_AI/Experimental`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
  /// Ordered, non-empty list of taxonomy labels
  pub labels:     Vec<String>,
  /// Confidence in `[0.0, 1.0]`
  pub confidence: f64,
}

impl ClassificationRecord {
  /// Creates a record from labels and a confidence score.
  pub fn new<I, S>(labels: I, confidence: f64) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>, {
    Self { labels: labels.into_iter().map(Into::into).collect(), confidence }
  }

  /// Name of the destination directory: labels joined by `_`.
  pub fn directory_name(&self) -> String { self.labels.join("_") }

  /// Classification path shown in the report: labels joined by `/`.
  pub fn display_path(&self) -> String { self.labels.join("/") }

  /// Confidence as a whole percentage, e.g. `"91%"`. Halves round to even.
  ///
  /// ```
  /// use papersort::record::ClassificationRecord;
  ///
  /// assert_eq!(ClassificationRecord::new(["Fintech"], 0.874).confidence_display(), "87%");
  /// ```
  pub fn confidence_display(&self) -> String {
    format!("{}%", (self.confidence * 100.0).round_ties_even() as i64)
  }
}

/// One line of the processing report.
///
/// Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
  /// File name of the input document
  pub original_name:       String,
  /// File name of the copy, empty when no copy was made
  pub new_name:            String,
  /// Labels joined by `/`
  pub classification_path: String,
  /// Confidence as an integer percentage
  #[serde(rename = "confidence")]
  pub confidence_display:  String,
  /// Warnings joined by `"; "`, or [`NO_WARNINGS`]
  pub warnings:            String,
}

impl ReportRow {
  /// Assembles a row from the outcome of processing one document.
  pub fn new(
    original_name: &str,
    new_name: &str,
    classification: &ClassificationRecord,
    warnings: &[String],
  ) -> Self {
    Self {
      original_name:       original_name.to_string(),
      new_name:            new_name.to_string(),
      classification_path: classification.display_path(),
      confidence_display:  classification.confidence_display(),
      warnings:            join_warnings(warnings),
    }
  }

  /// Whether the row carries any warning.
  pub fn has_warnings(&self) -> bool { self.warnings != NO_WARNINGS }
}

/// Joins warnings with `"; "`, falling back to the [`NO_WARNINGS`] sentinel.
pub fn join_warnings(warnings: &[String]) -> String {
  if warnings.is_empty() {
    NO_WARNINGS.to_string()
  } else {
    warnings.join("; ")
  }
}

/// Structured summary of a paper, as produced by the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
  /// Core conclusions
  pub summary:       String,
  /// Research methods
  pub methods:       String,
  /// Key contributions
  pub contributions: String,
  /// Related literature
  pub references:    String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classification_paths() {
    let classification = ClassificationRecord::new(["Medical_AI", "Experimental"], 0.91);
    assert_eq!(classification.directory_name(), "Medical_AI_Experimental");
    assert_eq!(classification.display_path(), "Medical_AI/Experimental");
    assert_eq!(classification.confidence_display(), "91%");
  }

  #[test]
  fn test_confidence_rounding() {
    assert_eq!(ClassificationRecord::new(["Review"], 0.0).confidence_display(), "0%");
    assert_eq!(ClassificationRecord::new(["Review"], 1.0).confidence_display(), "100%");
    assert_eq!(ClassificationRecord::new(["Review"], 0.876).confidence_display(), "88%");
    // Ties go to the even percentage.
    assert_eq!(ClassificationRecord::new(["Review"], 0.125).confidence_display(), "12%");
    assert_eq!(ClassificationRecord::new(["Review"], 0.625).confidence_display(), "62%");
    assert_eq!(ClassificationRecord::new(["Review"], 0.135).confidence_display(), "14%");
  }

  #[test]
  fn test_report_row_warnings() {
    let classification = ClassificationRecord::new(["Fintech"], 0.5);

    let clean = ReportRow::new("a.pdf", "Doe_2020_x.pdf", &classification, &[]);
    assert_eq!(clean.warnings, "none");
    assert!(!clean.has_warnings());

    let warned = ReportRow::new(
      "b.pdf",
      "Doe_2020_x_v1.pdf",
      &classification,
      &["first".to_string(), "second".to_string()],
    );
    assert_eq!(warned.warnings, "first; second");
    assert!(warned.has_warnings());
  }
}
