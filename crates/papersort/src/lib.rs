//! Research paper organization driven by a language model.
//!
//! `papersort` takes a directory of PDF papers and files them away:
//!
//! - Bibliographic metadata (title, authors, year) is extracted by a model
//! - Every paper gets a deterministic `{Author}_{year}_{title-words}.pdf` name
//! - A model classifies each paper against a fixed label taxonomy
//! - Copies land in a directory per classification, never overwriting anything
//! - A CSV report accounts for every paper that was processed
//!
//! A sibling pipeline in [`notes`] writes one structured Markdown summary per
//! paper.
//!
//! # Getting Started
//!
//! ```no_run
//! use papersort::{
//!   analysis::{LlmClassifier, LlmMetadataExtractor},
//!   config::Config,
//!   llm::LlmClient,
//!   organizer::Organizer,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path())?;
//!   let client = LlmClient::from_config(&config)?;
//!
//!   let organizer = Organizer::new(
//!     &config,
//!     LlmMetadataExtractor::new(client.clone(), &config),
//!     LlmClassifier::new(client, &config),
//!   );
//!   let report = organizer.process(&config.input_dir, &config.output_dir).await?;
//!   println!("Report written to {}", report.display());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`record`]: Metadata, classification, and report row types
//! - [`naming`]: Deterministic filename construction
//! - [`collision`]: Unique filename resolution within a directory
//! - [`organizer`]: The per-document pipeline
//! - [`report`]: CSV report serialization
//! - [`analysis`]: Model-backed extractor, classifier, and summarizer
//! - [`llm`]: Chat completions client
//! - [`pdf`]: Page-bounded PDF text extraction
//! - [`notes`]: Summary note generation
//! - [`config`]: Explicit configuration passed into every component

#![warn(missing_docs)]

use std::{
  collections::{BTreeMap, HashMap, HashSet},
  fmt::Display,
  fs,
  path::{Path, PathBuf},
};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
use url::Url;
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod analysis;
pub mod collision;
pub mod config;
pub mod discovery;
pub mod error;
pub mod llm;
pub mod naming;
pub mod notes;
pub mod organizer;
pub mod pdf;
pub mod record;
pub mod report;

use crate::{config::Config, error::*, record::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use papersort::prelude::*;
///
/// fn skipped(err: &PapersortError) -> bool {
///   matches!(err, PapersortError::ExtractionFailure(_) | PapersortError::MalformedModelOutput(_))
/// }
/// ```
pub mod prelude {
  pub use crate::{
    analysis::{Classifier, MetadataExtractor, Summarizer},
    error::{PapersortError, Result},
  };
}
