//! Module for the organize command.

use super::*;

/// Arguments that can be used for the [`Commands::Organize`]
#[derive(Args, Clone)]
pub struct OrganizeOptions {
  /// Directory of papers, overriding `input_dir` from the configuration
  #[arg(long, short)]
  pub input:  Option<PathBuf>,
  /// Output root, overriding `output_dir` from the configuration
  #[arg(long, short)]
  pub output: Option<PathBuf>,
}

/// Function for the [`Commands::Organize`] in the CLI.
pub async fn organize<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  options: &OrganizeOptions,
) -> Result<()> {
  let mut config = load_config(config_path)?;
  if let Some(input) = &options.input {
    config = config.with_input_dir(input);
  }
  if let Some(output) = &options.output {
    config = config.with_output_dir(output);
  }

  let client = LlmClient::from_config(&config)?;
  let organizer = Organizer::new(
    &config,
    LlmMetadataExtractor::new(client.clone(), &config),
    LlmClassifier::new(client, &config),
  );

  interaction.reply(ResponseContent::Info(&format!(
    "Organizing {} into {}",
    config.input_dir.display(),
    config.output_dir.display()
  )))?;
  let organized = organizer.organize(&config.input_dir, &config.output_dir).await?;
  let report = organizer.write_report(&organized, &config.output_dir)?;
  interaction.reply(ResponseContent::Organized { organized: &organized, report: &report })
}
