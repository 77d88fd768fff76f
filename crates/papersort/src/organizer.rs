//! The per-document organization pipeline.
//!
//! For every document found under the input directory the [`Organizer`]:
//!
//! 1. Asks the [`MetadataExtractor`] for a [`MetadataRecord`]. A failure skips the document without
//!    touching the filesystem or the report.
//! 2. Builds the candidate filename with the [`FilenameBuilder`].
//! 3. Asks the [`Classifier`] for labels. A failure routes the document to the fallback label with
//!    zero confidence and a warning.
//! 4. Creates the classification directory and resolves a unique name in it.
//! 5. Copies the document bytes to the resolved name, never replacing an existing file.
//! 6. Records a [`ReportRow`].
//!
//! Documents are processed one at a time in discovery order. Only failures
//! that affect the whole run (unreadable input directory, uncreatable output
//! directory, report serialization) are returned to the caller.

use std::io;

use crate::{
  analysis::{Classifier, MetadataExtractor},
  collision::CollisionResolver,
  discovery::discover_documents,
  naming::FilenameBuilder,
  report::ReportWriter,
};

use super::*;

/// Outcome of an organization run, before the report is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organized {
  /// One row per document whose metadata was extracted, in discovery order
  pub rows:    Vec<ReportRow>,
  /// Documents skipped because no metadata could be extracted
  pub skipped: Vec<PathBuf>,
}

impl Organized {
  /// Number of documents that were copied into the output tree.
  pub fn placed(&self) -> usize { self.rows.iter().filter(|row| !row.new_name.is_empty()).count() }

  /// Number of rows carrying at least one warning.
  pub fn warned(&self) -> usize { self.rows.iter().filter(|row| row.has_warnings()).count() }
}

/// Sorts a directory of documents into a classification tree.
///
/// # Examples
///
/// ```no_run
/// use papersort::{
///   analysis::{LlmClassifier, LlmMetadataExtractor},
///   config::Config,
///   llm::LlmClient,
///   organizer::Organizer,
/// };
///
/// # async fn example() -> papersort::error::Result<()> {
/// let config = Config::default().with_input_dir("papers").with_output_dir("organized");
/// let client = LlmClient::from_config(&config)?;
/// let organizer = Organizer::new(
///   &config,
///   LlmMetadataExtractor::new(client.clone(), &config),
///   LlmClassifier::new(client, &config),
/// );
///
/// let organized = organizer.organize(&config.input_dir, &config.output_dir).await?;
/// println!("{} placed, {} skipped", organized.placed(), organized.skipped.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Organizer<M, C> {
  /// Source of bibliographic metadata
  extractor:      M,
  /// Source of taxonomy labels
  classifier:     C,
  /// Candidate filename construction
  builder:        FilenameBuilder,
  /// Extension of the documents to pick up
  extension:      String,
  /// Cap on `_vN` variants per filename
  max_attempts:   usize,
  /// Label used when classification fails
  fallback_label: String,
  /// Serializer for the final report
  report:         ReportWriter,
}

impl<M: MetadataExtractor, C: Classifier> Organizer<M, C> {
  /// Creates an organizer from explicit configuration and its collaborators.
  pub fn new(config: &Config, extractor: M, classifier: C) -> Self {
    Self {
      extractor,
      classifier,
      builder: FilenameBuilder::new(&config.extension),
      extension: config.extension.clone(),
      max_attempts: config.max_collision_attempts,
      fallback_label: config.fallback_label.clone(),
      report: ReportWriter::new(&config.report_filename),
    }
  }

  /// Organizes `input_dir` into `output_dir` and writes the report.
  ///
  /// Returns the path of the report file.
  pub async fn process(&self, input_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let organized = self.organize(input_dir, output_dir).await?;
    self.write_report(&organized, output_dir)
  }

  /// Writes the report for a finished run into `output_dir`.
  pub fn write_report(&self, organized: &Organized, output_dir: &Path) -> Result<PathBuf> {
    let report = self.report.write(&organized.rows, output_dir)?;
    info!(
      "Organized {} document(s) ({} skipped), report at {report:?}",
      organized.rows.len(),
      organized.skipped.len()
    );
    Ok(report)
  }

  /// Organizes `input_dir` into `output_dir` without writing the report.
  pub async fn organize(&self, input_dir: &Path, output_dir: &Path) -> Result<Organized> {
    if !input_dir.is_dir() {
      return Err(PapersortError::InvalidInput(format!(
        "input directory {} does not exist",
        input_dir.display()
      )));
    }
    fs::create_dir_all(output_dir)?;

    let documents = discover_documents(input_dir, &self.extension, Some(output_dir))?;
    let mut resolver = CollisionResolver::new(self.max_attempts);
    let mut organized = Organized::default();

    for document in documents {
      match self.organize_one(&mut resolver, &document, output_dir).await {
        Some(row) => organized.rows.push(row),
        None => organized.skipped.push(document),
      }
    }

    Ok(organized)
  }

  /// Runs the pipeline for one document. `None` means the document was skipped.
  async fn organize_one(
    &self,
    resolver: &mut CollisionResolver,
    document: &Path,
    output_dir: &Path,
  ) -> Option<ReportRow> {
    let original_name = document.file_name()?.to_string_lossy().into_owned();

    let metadata = match self.extractor.extract(document).await {
      Ok(metadata) => metadata,
      Err(e) => {
        warn!("Skipping {original_name}: {e}");
        return None;
      },
    };
    let candidate = self.builder.build(&metadata);
    debug!("Candidate filename for {original_name} is {candidate}");

    let mut warnings = Vec::new();
    let classification = match self.classifier.classify(document).await {
      Ok(classification) => classification,
      Err(e) => {
        warn!("Classification of {original_name} failed, using {}: {e}", self.fallback_label);
        warnings.push(format!("classification failed ({e}), filed under {}", self.fallback_label));
        ClassificationRecord::new([self.fallback_label.as_str()], 0.0)
      },
    };

    let destination = output_dir.join(classification.directory_name());
    let new_name = match place(resolver, document, &destination, &candidate, &mut warnings) {
      Ok(filename) => {
        info!("{original_name} -> {}", destination.join(&filename).display());
        filename
      },
      Err(e) => {
        warn!("Could not place {original_name}: {e}");
        warnings.push(format!("not copied: {e}"));
        String::new()
      },
    };

    Some(ReportRow::new(&original_name, &new_name, &classification, &warnings))
  }
}

/// Creates `destination`, reserves a unique name for `candidate` in it, and
/// copies `document` there. Collision warnings are appended to `warnings`.
fn place(
  resolver: &mut CollisionResolver,
  document: &Path,
  destination: &Path,
  candidate: &str,
  warnings: &mut Vec<String>,
) -> Result<String> {
  fs::create_dir_all(destination)?;
  let resolution = resolver.resolve(destination, candidate)?;
  warnings.extend(resolution.warnings);

  if let Err(e) = copy_new(document, &destination.join(&resolution.filename)) {
    resolver.release(destination, &resolution.filename);
    return Err(e);
  }
  Ok(resolution.filename)
}

/// Copies `source` to `target`, failing if `target` already exists.
///
/// A partially written target is removed before the error is returned.
fn copy_new(source: &Path, target: &Path) -> Result<u64> {
  let mut reader = fs::File::open(source)?;
  let mut writer = fs::OpenOptions::new().write(true).create_new(true).open(target)?;

  match io::copy(&mut reader, &mut writer).and_then(|bytes| writer.sync_all().map(|()| bytes)) {
    Ok(bytes) => {
      trace!("Copied {bytes} bytes to {target:?}");
      Ok(bytes)
    },
    Err(e) => {
      drop(writer);
      remove_partial(target);
      Err(e.into())
    },
  }
}

/// Removes a file left behind by a failed write, logging if that fails too.
pub(crate) fn remove_partial(path: &Path) {
  if let Err(cleanup) = fs::remove_file(path) {
    warn!("Could not remove partial file {path:?}: {cleanup}");
  }
}
