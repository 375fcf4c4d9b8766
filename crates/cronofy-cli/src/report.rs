//! Text rendering of events and calendars.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use cronofy_api::{Calendar, Event, EventsRequest};
use cronofy_core::TimeWindow;

/// Day and month of an all-day event; the time slot is a placeholder.
pub const ALL_DAY_FORMAT: &str = "%d %b --:--";

/// Day, month and local time of a timed event.
pub const TIMED_FORMAT: &str = "%d %b %H:%M";

/// Builds the request for the report: `days` calendar days from today (UTC).
///
/// Returns `None` if the window ends past the representable date range.
pub fn report_request(
    now: DateTime<Utc>,
    days: u32,
    calendar_ids: Vec<String>,
) -> Option<EventsRequest> {
    let window = TimeWindow::from_now(now, Duration::days(i64::from(days)))?;
    let (from, to) = window.date_bounds();
    Some(
        EventsRequest::new()
            .with_calendar_ids(calendar_ids)
            .with_range(from, to)
            .with_tzid("UTC"),
    )
}

/// Renders one event line.
///
/// All-day events keep their UTC date. Timed events are shown in `tz`.
pub fn render_event(event: &Event, tz: Tz) -> String {
    if event.all_day {
        return format!("{}: {}", event.start_time.format(ALL_DAY_FORMAT), event.summary);
    }

    let start = event.start_time.with_timezone(&tz).format(TIMED_FORMAT);
    let location = event.location();
    if location.is_empty() {
        format!("{}: {}", start, event.summary)
    } else {
        format!("{}: {} [{}]", start, event.summary, location)
    }
}

/// Renders the accepted events, in the order given.
pub fn render_events(events: &[Event], tz: Tz) -> Vec<String> {
    events
        .iter()
        .filter(|event| event.accepted())
        .map(|event| render_event(event, tz))
        .collect()
}

/// Renders one calendar line.
pub fn render_calendar(calendar: &Calendar) -> String {
    let mut line = format!(
        "{} / {} ({})",
        calendar.profile_name, calendar.calendar_name, calendar.calendar_id
    );
    if calendar.read_only {
        line.push_str(" [read-only]");
    }
    if calendar.deleted {
        line.push_str(" [deleted]");
    }
    line
}
