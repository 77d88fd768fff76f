//! Markdown summary notes, one per paper.
//!
//! The [`Notebook`] walks the same documents the organizer would pick up, asks
//! a [`Summarizer`] for each, and writes a note named after the document's
//! file stem. Notes carry a small frontmatter block so they can be dropped into
//! a Markdown knowledge base as they are.
//!
//! Existing notes are never replaced: a second note for the same stem becomes
//! `{stem}_v1.md`, and so on.

use chrono::{DateTime, Utc};

use crate::{
  analysis::Summarizer, collision::CollisionResolver, discovery::discover_documents,
  organizer::remove_partial,
};

use super::*;

/// Writes summary notes for a directory of documents.
#[derive(Debug)]
pub struct Notebook<S> {
  /// Source of paper summaries
  summarizer:   S,
  /// Extension of the documents to pick up
  extension:    String,
  /// Cap on `_vN` variants per note name
  max_attempts: usize,
}

impl<S: Summarizer> Notebook<S> {
  /// Creates a notebook from explicit configuration and a summarizer.
  pub fn new(config: &Config, summarizer: S) -> Self {
    Self {
      summarizer,
      extension: config.extension.clone(),
      max_attempts: config.max_collision_attempts,
    }
  }

  /// Summarizes every document under `input_dir` into `notes_dir`.
  ///
  /// Returns the paths of the notes written, in discovery order. Documents
  /// that cannot be summarized are logged and skipped.
  pub async fn process(&self, input_dir: &Path, notes_dir: &Path) -> Result<Vec<PathBuf>> {
    let documents = discover_documents(input_dir, &self.extension, None)?;
    fs::create_dir_all(notes_dir)?;

    let mut resolver = CollisionResolver::new(self.max_attempts);
    let mut written = Vec::new();
    for document in documents {
      match self.write_note(&mut resolver, &document, notes_dir).await {
        Ok(path) => {
          info!("Wrote note {path:?}");
          written.push(path);
        },
        Err(e) => warn!("No note for {document:?}: {e}"),
      }
    }
    Ok(written)
  }

  async fn write_note(
    &self,
    resolver: &mut CollisionResolver,
    document: &Path,
    notes_dir: &Path,
  ) -> Result<PathBuf> {
    let (Some(stem), Some(source)) = (document.file_stem(), document.file_name()) else {
      return Err(PapersortError::InvalidInput(format!("{document:?} has no file name")));
    };
    let stem = stem.to_string_lossy();
    let source = source.to_string_lossy();

    let summary = self.summarizer.summarize(document).await?;
    let note = render_note(&stem, &source, &summary, Utc::now())?;

    let resolution = resolver.resolve(notes_dir, &format!("{stem}.md"))?;
    for warning in &resolution.warnings {
      debug!("{warning}");
    }
    let path = notes_dir.join(&resolution.filename);
    if let Err(e) = write_new(&path, &note) {
      resolver.release(notes_dir, &resolution.filename);
      return Err(e);
    }
    Ok(path)
  }
}

/// Renders a note with frontmatter and the four summary sections.
///
/// Frontmatter values are written as JSON strings, which are also valid YAML
/// double-quoted scalars.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use papersort::{notes::render_note, record::PaperSummary};
///
/// let summary = PaperSummary {
///   summary:       "Noise helps.".into(),
///   methods:       "Simulation".into(),
///   contributions: "A model".into(),
///   references:    "Smith 2020".into(),
/// };
/// let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let note = render_note("paper1", "paper1.pdf", &summary, created).unwrap();
///
/// assert!(note.starts_with("---\ntitle: \"paper1\"\n"));
/// assert!(note.contains("- **Core conclusions**: Noise helps.\n"));
/// ```
pub fn render_note(
  title: &str,
  source: &str,
  summary: &PaperSummary,
  created: DateTime<Utc>,
) -> Result<String> {
  Ok(format!(
    "---\ntitle: {}\nsource: {}\ncreated: {}\n---\n## {title}\n- **Core conclusions**: {}\n- \
     **Methods**: {}\n- **Key contributions**: {}\n- **Related literature**: {}\n",
    serde_json::to_string(title)?,
    serde_json::to_string(source)?,
    serde_json::to_string(&created.to_rfc3339())?,
    single_line(&summary.summary),
    single_line(&summary.methods),
    single_line(&summary.contributions),
    single_line(&summary.references),
  ))
}

/// Collapses line breaks so a value stays inside its bullet.
fn single_line(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }

/// Writes `content` to `path`, failing if the file already exists.
fn write_new(path: &Path, content: &str) -> Result<()> {
  use std::io::Write;

  let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
  if let Err(e) = file.write_all(content.as_bytes()) {
    drop(file);
    remove_partial(path);
    return Err(e.into());
  }
  Ok(())
}
