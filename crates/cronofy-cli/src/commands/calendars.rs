//! Calendar listing.

use std::io::Write;

use cronofy_api::CallContext;

use crate::config::CliConfig;
use crate::error::ClientResult;
use crate::report;

/// Prints one line per calendar.
pub async fn run(config: &CliConfig, ctx: &CallContext) -> ClientResult<()> {
    let client = super::connect(config)?;
    let calendars = client.list_calendars(ctx).await?;

    let mut stdout = std::io::stdout().lock();
    for calendar in &calendars {
        writeln!(stdout, "{}", report::render_calendar(calendar))?;
    }

    Ok(())
}
