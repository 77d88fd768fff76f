//! CSV serialization of the processing report.

use csv::WriterBuilder;

use super::*;

/// Header row of the report, in column order.
pub const REPORT_COLUMNS: [&str; 5] =
  ["original_name", "new_name", "classification_path", "confidence", "warnings"];

/// Writes [`ReportRow`]s as a five-column CSV file.
///
/// The whole table is rendered in memory and written with a single call, so a
/// failure while serializing never leaves a half-written report behind.
///
/// ```
/// use papersort::{
///   record::{ClassificationRecord, ReportRow},
///   report::ReportWriter,
/// };
///
/// # fn main() -> papersort::error::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let classification = ClassificationRecord::new(["Medical_AI"], 0.91);
/// let rows = vec![ReportRow::new(
///   "paper1.pdf",
///   "Smith_etal_2022_Effects-Noise.pdf",
///   &classification,
///   &[],
/// )];
///
/// let path = ReportWriter::default().write(&rows, dir.path())?;
/// let report = std::fs::read_to_string(path)?;
/// assert!(report.ends_with("paper1.pdf,Smith_etal_2022_Effects-Noise.pdf,Medical_AI,91%,none\n"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReportWriter {
  /// File name of the report inside the output directory
  filename: String,
}

impl Default for ReportWriter {
  fn default() -> Self { Self::new("processing_report.csv") }
}

impl ReportWriter {
  /// Creates a writer producing `filename` in the output directory.
  pub fn new(filename: &str) -> Self { Self { filename: filename.to_string() } }

  /// Serializes `rows` in order into the report file under `output_dir`.
  ///
  /// An existing report is replaced. Returns the report path.
  pub fn write(&self, rows: &[ReportRow], output_dir: &Path) -> Result<PathBuf> {
    let bytes = Self::render(rows)?;
    let path = output_dir.join(&self.filename);
    fs::write(&path, bytes)?;
    debug!("Wrote {} report row(s) to {path:?}", rows.len());
    Ok(path)
  }

  /// Renders the header and rows as CSV bytes.
  pub fn render(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
      writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| PapersortError::Path(e.into_error()))
  }
}
