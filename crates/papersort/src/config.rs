//! Explicit configuration for every pipeline component.
//!
//! A [`Config`] is loaded once (usually from `config.toml` in the platform
//! config directory) and handed to each component when it is constructed.
//! Nothing in the library reads global state, except that the API key may be
//! supplied through the `PAPERSORT_API_KEY` environment variable so it does
//! not have to live in the file.
//!
//! # Examples
//!
//! ```no_run
//! use papersort::config::Config;
//!
//! # fn example() -> papersort::error::Result<()> {
//! let config = Config::load(Config::default_path())?
//!   .with_input_dir("~/Downloads/papers")
//!   .with_output_dir("~/Library/papers");
//! config.validate()?;
//! # Ok(())
//! # }
//! ```
//!
//! Example file:
//!
//! ```toml
//! api_key = "sk-..."
//! api_base_url = "https://api.deepseek.com"
//! model = "deepseek-chat"
//! input_dir = "papers"
//! output_dir = "organized"
//! metadata_pages = 3
//! classification_pages = 5
//!
//! [taxonomy]
//! high_priority = ["Medical_AI", "Fintech", "Quantum_Physics", "Climate_Model"]
//! method = ["Experimental", "Theoretical", "Review"]
//! application = ["Healthcare", "Finance", "Energy"]
//! ```

use super::*;

/// Environment variable that overrides [`Config::api_key`].
pub const API_KEY_ENV: &str = "PAPERSORT_API_KEY";

/// All recognized configuration options.
///
/// Every field has a default, so a config file only needs the values that
/// differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Credential for the chat completions API
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key:                Option<String>,
  /// Base URL of an OpenAI-compatible API
  pub api_base_url:           String,
  /// Model identifier sent with every request
  pub model:                  String,
  /// Seconds before a model request is abandoned
  pub request_timeout_secs:   u64,
  /// Directory scanned (recursively) for documents
  pub input_dir:              PathBuf,
  /// Root of the classification tree and the report
  pub output_dir:             PathBuf,
  /// Directory receiving summary notes
  pub notes_dir:              PathBuf,
  /// Pages of text sent for metadata extraction
  pub metadata_pages:         usize,
  /// Pages of text sent for classification
  pub classification_pages:   usize,
  /// Words of text sent for summarization
  pub summary_word_limit:     usize,
  /// Document extension, without the dot
  pub extension:              String,
  /// File name of the report under the output directory
  pub report_filename:        String,
  /// Cap on `_vN` variants probed per filename
  pub max_collision_attempts: usize,
  /// Label used when classification fails
  pub fallback_label:         String,
  /// Labels the classifier may choose from
  pub taxonomy:               Taxonomy,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_key:                None,
      api_base_url:           "https://api.deepseek.com".to_string(),
      model:                  "deepseek-chat".to_string(),
      request_timeout_secs:   120,
      input_dir:              PathBuf::from("papers"),
      output_dir:             PathBuf::from("organized"),
      notes_dir:              PathBuf::from("notes"),
      metadata_pages:         3,
      classification_pages:   5,
      summary_word_limit:     65536,
      extension:              "pdf".to_string(),
      report_filename:        "processing_report.csv".to_string(),
      max_collision_attempts: collision::DEFAULT_MAX_ATTEMPTS,
      fallback_label:         "Unclassified".to_string(),
      taxonomy:               Taxonomy::default(),
    }
  }
}

impl Config {
  /// Default location of the configuration file.
  ///
  /// - On Unix: `~/.config/papersort/config.toml`
  /// - On macOS: `~/Library/Application Support/papersort/config.toml`
  /// - On Windows: `%APPDATA%\papersort\config.toml`
  /// - Fallback: `./papersort/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("papersort").join("config.toml")
  }

  /// Reads and validates a configuration file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {path:?}");
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Writes the configuration as TOML, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Sets the API credential.
  pub fn with_api_key(mut self, api_key: &str) -> Self {
    self.api_key = Some(api_key.to_string());
    self
  }

  /// Sets the API base URL.
  pub fn with_api_base_url(mut self, url: &str) -> Self {
    self.api_base_url = url.to_string();
    self
  }

  /// Sets the model identifier.
  pub fn with_model(mut self, model: &str) -> Self {
    self.model = model.to_string();
    self
  }

  /// Sets the input directory.
  pub fn with_input_dir(mut self, path: impl AsRef<Path>) -> Self {
    self.input_dir = path.as_ref().to_path_buf();
    self
  }

  /// Sets the output directory.
  pub fn with_output_dir(mut self, path: impl AsRef<Path>) -> Self {
    self.output_dir = path.as_ref().to_path_buf();
    self
  }

  /// Sets the notes directory.
  pub fn with_notes_dir(mut self, path: impl AsRef<Path>) -> Self {
    self.notes_dir = path.as_ref().to_path_buf();
    self
  }

  /// The API key, preferring the `PAPERSORT_API_KEY` environment variable.
  pub fn resolved_api_key(&self) -> Result<String> {
    std::env::var(API_KEY_ENV)
      .ok()
      .filter(|key| !key.trim().is_empty())
      .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
      .ok_or_else(|| {
        PapersortError::Config(format!(
          "No API key configured. Set `api_key` in the config file or export {API_KEY_ENV}."
        ))
      })
  }

  /// Checks the values that would otherwise only fail deep inside a run.
  pub fn validate(&self) -> Result<()> {
    if self.metadata_pages == 0 || self.classification_pages == 0 {
      return Err(PapersortError::Config("Page limits must be at least 1.".into()));
    }
    if self.summary_word_limit == 0 {
      return Err(PapersortError::Config("`summary_word_limit` must be at least 1.".into()));
    }
    if self.max_collision_attempts == 0 {
      return Err(PapersortError::Config("`max_collision_attempts` must be at least 1.".into()));
    }
    if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
      return Err(PapersortError::Config(format!(
        "`extension` must be a bare extension such as \"pdf\", got {:?}",
        self.extension
      )));
    }
    if self.report_filename.is_empty() || self.report_filename.contains(['/', '\\']) {
      return Err(PapersortError::Config(format!(
        "`report_filename` must be a plain file name, got {:?}",
        self.report_filename
      )));
    }
    validate_label(&self.fallback_label)?;
    self.taxonomy.validate()
  }
}

/// Named groups of classification labels.
///
/// Only membership matters to the classifier; the group names are passed to
/// the model as context.
///
/// ```
/// use papersort::config::Taxonomy;
///
/// let taxonomy = Taxonomy::default();
/// assert!(taxonomy.contains("Medical_AI"));
/// assert!(!taxonomy.contains("Astrology"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy(BTreeMap<String, Vec<String>>);

impl Default for Taxonomy {
  fn default() -> Self {
    let groups: [(&str, &[&str]); 3] = [
      ("high_priority", &["Medical_AI", "Fintech", "Quantum_Physics", "Climate_Model"]),
      ("method", &["Experimental", "Theoretical", "Review"]),
      ("application", &["Healthcare", "Finance", "Energy"]),
    ];
    Self(
      groups
        .into_iter()
        .map(|(group, labels)| {
          (group.to_string(), labels.iter().map(|label| label.to_string()).collect())
        })
        .collect(),
    )
  }
}

impl Taxonomy {
  /// Builds a taxonomy from `(group, labels)` pairs.
  pub fn new<I, G, L>(groups: I) -> Self
  where
    I: IntoIterator<Item = (G, Vec<L>)>,
    G: Into<String>,
    L: Into<String>, {
    Self(
      groups
        .into_iter()
        .map(|(group, labels)| (group.into(), labels.into_iter().map(Into::into).collect()))
        .collect(),
    )
  }

  /// Whether `label` belongs to any group.
  pub fn contains(&self, label: &str) -> bool {
    self.0.values().any(|labels| labels.iter().any(|l| l == label))
  }

  /// All labels, group by group.
  pub fn labels(&self) -> impl Iterator<Item = &str> {
    self.0.values().flatten().map(String::as_str)
  }

  /// Groups and their labels.
  pub fn groups(&self) -> &BTreeMap<String, Vec<String>> { &self.0 }

  /// Rejects empty taxonomies and labels that cannot be directory names.
  pub fn validate(&self) -> Result<()> {
    if self.labels().next().is_none() {
      return Err(PapersortError::Config("The taxonomy has no labels.".into()));
    }
    self.labels().try_for_each(validate_label)
  }
}

impl Display for Taxonomy {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (index, (group, labels)) in self.0.iter().enumerate() {
      if index > 0 {
        write!(f, "; ")?;
      }
      write!(f, "{group}: {}", labels.join(", "))?;
    }
    Ok(())
  }
}

/// A label must be usable as a single path component.
fn validate_label(label: &str) -> Result<()> {
  if label.trim().is_empty()
    || label == "."
    || label == ".."
    || label.contains(['/', '\\'])
    || label.chars().any(char::is_control)
  {
    return Err(PapersortError::Config(format!("Invalid classification label {label:?}")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_valid() {
    Config::default().validate().unwrap();
  }

  #[test]
  fn test_partial_file_uses_defaults() {
    let config: Config = toml::from_str(
      r#"
      model = "gpt-4o-mini"
      input_dir = "/data/in"
      metadata_pages = 2
      "#,
    )
    .unwrap();

    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.input_dir, PathBuf::from("/data/in"));
    assert_eq!(config.metadata_pages, 2);
    assert_eq!(config.classification_pages, 5);
    assert_eq!(config.report_filename, "processing_report.csv");
    assert!(config.taxonomy.contains("Fintech"));
  }

  #[test]
  fn test_unknown_keys_rejected() {
    assert!(toml::from_str::<Config>("modle = \"typo\"").is_err());
  }

  #[test]
  fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config::default().with_api_key("secret").with_model("deepseek-reasoner");

    config.save(&path).unwrap();
    assert_eq!(Config::load(&path).unwrap(), config);
  }

  #[test]
  fn test_validation_failures() {
    let config = Config { metadata_pages: 0, ..Config::default() };
    assert!(config.validate().is_err());

    let config = Config { max_collision_attempts: 0, ..Config::default() };
    assert!(config.validate().is_err());

    let config = Config { extension: ".pdf".to_string(), ..Config::default() };
    assert!(config.validate().is_err());

    let config = Config { fallback_label: "../escape".to_string(), ..Config::default() };
    assert!(config.validate().is_err());

    let config = Config { taxonomy: Taxonomy::new([("bad", vec![".."])]), ..Config::default() };
    assert!(config.validate().is_err());

    let config =
      Config { taxonomy: Taxonomy::new(Vec::<(String, Vec<String>)>::new()), ..Config::default() };
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_taxonomy_display() {
    let taxonomy = Taxonomy::new([("method", vec!["Review"]), ("application", vec!["Energy"])]);
    assert_eq!(taxonomy.to_string(), "application: Energy; method: Review");
    assert_eq!(taxonomy.labels().collect::<Vec<_>>(), vec!["Energy", "Review"]);
  }
}
