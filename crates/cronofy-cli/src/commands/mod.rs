//! Subcommand implementations.

pub mod calendars;
pub mod config;
pub mod events;

use cronofy_api::{ClientConfig, CronofyClient};

use crate::config::CliConfig;
use crate::error::{ClientError, ClientResult};

/// Builds an API client from the effective configuration.
pub(crate) fn connect(config: &CliConfig) -> ClientResult<CronofyClient> {
    let token = config
        .api
        .resolve_access_token()
        .map_err(ClientError::Config)?;

    let mut client_config = ClientConfig::new(token);
    if let Some(ref base_url) = config.api.base_url {
        client_config = client_config.with_base_url(base_url.clone());
    }

    Ok(CronofyClient::new(client_config)?)
}
