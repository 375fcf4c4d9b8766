//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/cronofy/config.toml` by default:
//!
//! ```toml
//! [api]
//! access_token = "env::CRONOFY_TOKEN"
//!
//! [report]
//! calendar_ids = ["cal_abc"]
//! timezone = "Europe/Paris"
//! days = 7
//! ```
//!
//! Command-line flags override the file.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Time zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Number of days reported when none is configured.
pub const DEFAULT_DAYS: u32 = 7;

/// Longest report, in days.
pub const MAX_DAYS: u32 = 366;

// ---------------------------------------------------------------------------
// CliConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the cronofy client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// API connection settings.
    pub api: ApiSettings,

    /// Report settings.
    pub report: ReportSettings,
}

/// API connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Access token (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Overall deadline for a command, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Settings for the events report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Calendars to report on; empty means all.
    pub calendar_ids: Vec<String>,

    /// IANA time zone timed events are shown in.
    pub timezone: String,

    /// Number of days to report, starting today.
    pub days: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            calendar_ids: Vec::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            days: DEFAULT_DAYS,
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cronofy")
    }

    /// Overlays the values given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref token) = cli.access_token {
            self.api.access_token = Some(token.clone());
        }
        if let Some(ref base_url) = cli.base_url {
            self.api.base_url = Some(base_url.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.api.timeout = Some(timeout);
        }
        if !cli.calendar_ids.is_empty() {
            self.report.calendar_ids = cli.calendar_ids.clone();
        }
        if let Some(ref timezone) = cli.timezone {
            self.report.timezone = timezone.clone();
        }
        if let Some(days) = cli.days {
            self.report.days = days;
        }
    }

    /// Checks every setting a command could need.
    pub fn validate(&self) -> Result<(), String> {
        self.api.resolve_access_token()?;
        self.report.tz()?;
        self.report.checked_days()?;
        Ok(())
    }
}

impl ApiSettings {
    /// Resolves the access token, expanding `pass::` and `env::` references.
    pub fn resolve_access_token(&self) -> Result<String, String> {
        let raw = self.access_token.as_deref().ok_or_else(|| {
            format!(
                "access token not found. Pass --access-token, set CRONOFY_ACCESS_TOKEN, or add to {}:\n  \
                 [api]\n  \
                 access_token = \"env::CRONOFY_TOKEN\"",
                CliConfig::default_path().display()
            )
        })?;

        let token = crate::secret::resolve(raw)
            .map_err(|e| format!("failed to resolve access_token: {}", e))?;
        if token.trim().is_empty() {
            return Err("access token is empty".to_string());
        }
        Ok(token)
    }
}

impl ReportSettings {
    /// Parses the configured time zone.
    pub fn tz(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| format!("invalid timezone {:?}: {}", self.timezone, e))
    }

    /// Returns the report length, rejecting 0 and anything over [`MAX_DAYS`].
    pub fn checked_days(&self) -> Result<u32, String> {
        match self.days {
            0 => Err("report days must be at least 1".to_string()),
            days if days > MAX_DAYS => Err(format!(
                "report days must be at most {}, got {}",
                MAX_DAYS, days
            )),
            days => Ok(days),
        }
    }

    /// Calendar IDs with blank entries removed.
    pub fn selected_calendar_ids(&self) -> Vec<String> {
        self.calendar_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert!(config.api.access_token.is_none());
        assert_eq!(config.report.timezone, "UTC");
        assert_eq!(config.report.days, 7);
        assert_eq!(config.report.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
[api]
access_token = "tok_file"

[report]
calendar_ids = ["cal_a", "cal_b"]
timezone = "Europe/Paris"
days = 3
"#,
        );
        let config = CliConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api.access_token.as_deref(), Some("tok_file"));
        assert_eq!(config.report.calendar_ids, ["cal_a", "cal_b"]);
        assert_eq!(config.report.tz().unwrap(), chrono_tz::Europe::Paris);
        assert_eq!(config.report.days, 3);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config("[api]\naccess_token = \"tok\"\n");
        let config = CliConfig::load_from(file.path()).unwrap();
        assert_eq!(config.report, ReportSettings::default());
    }

    #[test]
    fn missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.contains("failed to read config"));
    }

    #[test]
    fn malformed_file_errors() {
        let file = write_config("[report]\ndays = \"seven\"\n");
        let err = CliConfig::load_from(file.path()).unwrap_err();
        assert!(err.contains("failed to parse config"));
    }

    #[test]
    fn cli_overrides_file() {
        let file = write_config(
            "[api]\naccess_token = \"tok_file\"\n[report]\ntimezone = \"Asia/Tokyo\"\ndays = 3\n",
        );
        let mut config = CliConfig::load_from(file.path()).unwrap();
        let cli = Cli::try_parse_from([
            "cronofy",
            "--access-token",
            "tok_flag",
            "--days",
            "14",
            "--calendar-ids",
            "cal_x",
        ])
        .unwrap();
        config.apply_cli(&cli);

        assert_eq!(config.api.access_token.as_deref(), Some("tok_flag"));
        assert_eq!(config.report.days, 14);
        assert_eq!(config.report.timezone, "Asia/Tokyo");
        assert_eq!(config.report.calendar_ids, ["cal_x"]);
    }

    #[test]
    fn env_reference_in_token() {
        unsafe {
            std::env::set_var("_CRONOFY_CONFIG_TEST_TOKEN", "tok_from_env");
        }
        let file = write_config("[api]\naccess_token = \"env::_CRONOFY_CONFIG_TEST_TOKEN\"\n");
        let config = CliConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api.resolve_access_token().unwrap(), "tok_from_env");
        unsafe {
            std::env::remove_var("_CRONOFY_CONFIG_TEST_TOKEN");
        }
    }

    #[test]
    fn missing_token_explains_how_to_set_it() {
        let err = ApiSettings::default().resolve_access_token().unwrap_err();
        assert!(err.contains("--access-token"));
        assert!(err.contains("[api]"));
    }

    #[test]
    fn blank_token_is_rejected() {
        let settings = ApiSettings {
            access_token: Some("  ".to_string()),
            ..ApiSettings::default()
        };
        assert!(settings.resolve_access_token().is_err());
    }

    #[test]
    fn validate_checks_timezone_and_days() {
        let mut config = CliConfig::default();
        config.api.access_token = Some("tok".to_string());
        assert!(config.validate().is_ok());

        config.report.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().unwrap_err().contains("Mars/Olympus"));

        config.report.timezone = "UTC".to_string();
        config.report.days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn days_are_bounded() {
        let report = |days| ReportSettings {
            days,
            ..ReportSettings::default()
        };
        assert_eq!(report(1).checked_days(), Ok(1));
        assert_eq!(report(MAX_DAYS).checked_days(), Ok(MAX_DAYS));
        assert!(report(0).checked_days().is_err());
        assert!(
            report(200_000_000)
                .checked_days()
                .unwrap_err()
                .contains("at most 366")
        );
    }

    #[test]
    fn blank_calendar_ids_are_dropped() {
        let report = ReportSettings {
            calendar_ids: vec!["".to_string(), "cal_a".to_string(), " ".to_string()],
            ..ReportSettings::default()
        };
        assert_eq!(report.selected_calendar_ids(), ["cal_a"]);
    }

    #[test]
    fn dump_omits_unset_values() {
        let toml_str = toml::to_string_pretty(&CliConfig::default()).unwrap();
        assert!(!toml_str.contains("access_token"));
        assert!(toml_str.contains("timezone = \"UTC\""));
    }
}
