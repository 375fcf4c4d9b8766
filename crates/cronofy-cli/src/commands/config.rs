//! Configuration commands.

use crate::config::CliConfig;
use crate::error::{ClientError, ClientResult};
use crate::secret;

/// Placeholder printed instead of a literal access token.
const REDACTED: &str = "<redacted>";

/// Dump the effective configuration to stdout.
///
/// A literal access token is masked; `env::` and `pass::` references are shown.
pub fn dump(config: &CliConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&redacted(config))
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", CliConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &CliConfig) -> ClientResult<()> {
    config.validate().map_err(ClientError::Config)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    println!("config: {}", CliConfig::default_path().display());
    Ok(())
}

fn redacted(config: &CliConfig) -> CliConfig {
    let mut config = config.clone();
    if config
        .api
        .access_token
        .as_deref()
        .is_some_and(|token| !secret::is_reference(token))
    {
        config.api.access_token = Some(REDACTED.to_string());
    }
    config
}
