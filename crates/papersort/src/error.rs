//! Error types for the papersort library.
//!
//! A single error enum covers every failure the pipeline can hit:
//! - Model collaborators that return nothing usable or malformed output
//! - Filename collision probing that runs out of attempts
//! - Network and API errors when talking to the language model
//! - Filesystem, PDF, and serialization failures
//!
//! Whether an error is fatal depends on where it surfaces. The
//! [`Organizer`](crate::organizer::Organizer) contains per-document failures and
//! only returns errors that affect the whole run.
//!
//! # Examples
//!
//! ```
//! use papersort::error::PapersortError;
//!
//! fn describe(err: &PapersortError) -> &'static str {
//!   match err {
//!     PapersortError::ExtractionFailure(_) => "skipped",
//!     PapersortError::MalformedModelOutput(_) => "skipped (bad model output)",
//!     PapersortError::ResolutionFailure { .. } => "no free filename",
//!     _ => "other",
//!   }
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Error type alias used for the [`papersort`](crate) crate.
pub type Result<T> = core::result::Result<T, PapersortError>;

/// Errors that can occur while organizing or summarizing papers.
#[derive(Error, Debug)]
pub enum PapersortError {
  /// A collaborator could not produce a usable record for a document.
  ///
  /// This occurs when:
  /// - The PDF contains no extractable text in the requested pages
  /// - The model replied with an empty message
  ///
  /// The organizer skips the document without producing any output.
  #[error("Extraction failed: {0}")]
  ExtractionFailure(String),

  /// The model replied with something that does not match the expected schema.
  ///
  /// Model output is untrusted. It is only ever deserialized into a fixed
  /// schema and validated, so anything unexpected ends up here.
  #[error("Malformed model output: {0}")]
  MalformedModelOutput(String),

  /// Every probed `_vN` variant of a filename was already taken.
  #[error("No free filename for \"{candidate}\" in {directory:?} after {attempts} attempts")]
  ResolutionFailure {
    /// Directory the name was being resolved in
    directory: PathBuf,
    /// The candidate filename that kept colliding
    candidate: String,
    /// Number of variants probed before giving up
    attempts:  usize,
  },

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The language model API returned an error response.
  ///
  /// The string holds the status and body returned by the API.
  #[error("API error: {0}")]
  ApiError(String),

  /// A model was not specified for the LLM request.
  #[error("No model was chosen for the LLM.")]
  LLMMissingModel,

  /// No messages were provided in the LLM request.
  #[error("No messages were supplied to send to the LLM.")]
  LLMMissingMessage,

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Reading an input document fails
  /// - Creating an output directory fails
  /// - Copying a document or writing the report fails
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// Walking the input directory failed.
  #[error(transparent)]
  Walk(#[from] walkdir::Error),

  /// PDF parsing errors from the lopdf library.
  ///
  /// Common causes are malformed, truncated, or encrypted files.
  #[error(transparent)]
  Lopdf(#[from] lopdf::Error),

  /// JSON (de)serialization failed outside of model output handling.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The report could not be serialized.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// The configured API endpoint is not a valid URL.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// The configuration is missing a value or holds an invalid one.
  #[error("{0}")]
  Config(String),

  /// A caller supplied an input the pipeline cannot work with, such as an
  /// input directory that does not exist.
  #[error("Invalid input: {0}")]
  InvalidInput(String),
}
