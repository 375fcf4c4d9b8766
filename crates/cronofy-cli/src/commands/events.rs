//! The upcoming accepted events report.

use std::io::Write;

use chrono::Utc;
use cronofy_api::CallContext;
use tracing::debug;

use crate::config::CliConfig;
use crate::error::{ClientError, ClientResult};
use crate::report;

/// Prints the accepted events of the next `report.days` days.
///
/// Events whose dates could not be read are reported on stderr and skipped.
pub async fn run(config: &CliConfig, ctx: &CallContext) -> ClientResult<()> {
    let tz = config.report.tz().map_err(ClientError::Config)?;
    let days = config.report.checked_days().map_err(ClientError::Config)?;
    let client = super::connect(config)?;

    let request =
        report::report_request(Utc::now(), days, config.report.selected_calendar_ids())
            .ok_or_else(|| {
                ClientError::Config(format!("a {} day report runs past the calendar", days))
            })?;
    let response = client.list_events(ctx, &request).await?;
    debug!(
        events = response.events.len(),
        failures = response.failures.len(),
        page = response.pages.current,
        pages = response.pages.total,
        "events fetched"
    );

    for failure in &response.failures {
        eprintln!("warning: skipping {}", failure);
    }

    let mut stdout = std::io::stdout().lock();
    for line in report::render_events(&response.events, tz) {
        writeln!(stdout, "{}", line)?;
    }

    Ok(())
}
