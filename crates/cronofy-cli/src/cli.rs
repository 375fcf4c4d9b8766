//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cronofy - Your upcoming accepted events
#[derive(Debug, Parser)]
#[command(name = "cronofy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CRONOFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- API flags ---
    /// Cronofy access token (supports `env::` and `pass::` references)
    #[arg(long, env = "CRONOFY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    // --- Report flags ---
    /// Calendar IDs (comma separated)
    #[arg(long, env = "CRONOFY_CALENDAR_IDS", value_delimiter = ',')]
    pub calendar_ids: Vec<String>,

    /// IANA time zone for timed events
    #[arg(long, env = "CRONOFY_TIMEZONE")]
    pub timezone: Option<String>,

    /// Number of days to report, starting today
    #[arg(long)]
    pub days: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List upcoming accepted events (default)
    Events,

    /// List the calendars of the account
    Calendars,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["cronofy"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn calendar_ids_split_on_commas() {
        let cli =
            Cli::try_parse_from(["cronofy", "--calendar-ids", "cal_a,cal_b", "events"]).unwrap();
        assert_eq!(cli.calendar_ids, ["cal_a", "cal_b"]);
        assert!(matches!(cli.command, Some(Command::Events)));
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::try_parse_from(["cronofy", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn days_must_be_a_number() {
        assert!(Cli::try_parse_from(["cronofy", "--days", "week"]).is_err());
    }
}
