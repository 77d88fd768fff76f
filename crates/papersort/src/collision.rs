//! Unique filename resolution within a destination directory.
//!
//! The [`CollisionResolver`] is the only component that decides final output
//! names. A candidate that is free is returned unchanged. A taken candidate is
//! retried as `{base}_v1{ext}`, `{base}_v2{ext}`, … up to a fixed number of
//! attempts, and every collision is reported back as a warning.
//!
//! A name counts as taken when a file with that name exists in the directory
//! or when the resolver already handed it out earlier in the same run. The
//! second rule makes the existence check and the claim a single step, so two
//! documents resolving the same candidate never receive the same answer, even
//! before the first copy has been written.
//!
//! The resolver is not safe against other processes writing into the same
//! directory at the same time.

use super::*;

/// Default cap on the number of `_vN` variants probed.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Outcome of resolving a candidate filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  /// The unique filename to write
  pub filename: String,
  /// One human-readable warning per collision encountered
  pub warnings: Vec<String>,
}

impl Resolution {
  /// Whether the candidate had to be renamed.
  pub fn renamed(&self) -> bool { !self.warnings.is_empty() }
}

/// Hands out filenames that are unique per directory for the lifetime of the
/// resolver.
///
/// # Examples
///
/// ```
/// use papersort::collision::CollisionResolver;
///
/// # fn main() -> papersort::error::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let mut resolver = CollisionResolver::new(10);
///
/// let first = resolver.resolve(dir.path(), "Smith_2021_deep-learning.pdf")?;
/// let second = resolver.resolve(dir.path(), "Smith_2021_deep-learning.pdf")?;
///
/// assert_eq!(first.filename, "Smith_2021_deep-learning.pdf");
/// assert_eq!(second.filename, "Smith_2021_deep-learning_v1.pdf");
/// assert!(second.renamed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CollisionResolver {
  /// Maximum number of `_vN` variants to probe
  max_attempts: usize,
  /// Names handed out so far, per directory
  reserved:     HashMap<PathBuf, HashSet<String>>,
}

impl Default for CollisionResolver {
  fn default() -> Self { Self::new(DEFAULT_MAX_ATTEMPTS) }
}

impl CollisionResolver {
  /// Creates a resolver probing at most `max_attempts` variants per candidate.
  pub fn new(max_attempts: usize) -> Self { Self { max_attempts, reserved: HashMap::new() } }

  /// Returns a filename not present in `directory` and reserves it.
  ///
  /// # Errors
  ///
  /// Returns [`PapersortError::ResolutionFailure`] when the candidate and all
  /// probed variants are taken.
  pub fn resolve(&mut self, directory: &Path, candidate: &str) -> Result<Resolution> {
    let mut warnings = Vec::new();
    let mut filename = candidate.to_string();
    let (base, extension) = split_extension(candidate);

    let mut counter = 0;
    while self.is_taken(directory, &filename) {
      counter += 1;
      if counter > self.max_attempts {
        return Err(PapersortError::ResolutionFailure {
          directory: directory.to_path_buf(),
          candidate: candidate.to_string(),
          attempts:  self.max_attempts,
        });
      }
      let next = format!("{base}_v{counter}{extension}");
      debug!("Filename {filename} is taken in {directory:?}, trying {next}");
      warnings.push(format!("filename collision on {filename}, renamed to {next}"));
      filename = next;
    }

    self.reserved.entry(directory.to_path_buf()).or_default().insert(filename.clone());
    Ok(Resolution { filename, warnings })
  }

  /// Gives a reserved name back, e.g. when the copy it was meant for failed.
  ///
  /// Returns whether the name had been reserved.
  pub fn release(&mut self, directory: &Path, filename: &str) -> bool {
    self.reserved.get_mut(directory).is_some_and(|names| names.remove(filename))
  }

  /// Whether `filename` exists in `directory` or was already handed out.
  fn is_taken(&self, directory: &Path, filename: &str) -> bool {
    self.reserved.get(directory).is_some_and(|names| names.contains(filename))
      || directory.join(filename).exists()
  }
}

/// Splits `name` at its last `.` into base and extension (dot included).
///
/// Names without an extension, and dotfiles such as `.hidden`, get an empty
/// extension.
fn split_extension(name: &str) -> (&str, &str) {
  match name.rfind('.') {
    Some(index) if index > 0 => name.split_at(index),
    _ => (name, ""),
  }
}
