//! Wire shape to domain type conversion.
//!
//! Each [`RawEvent`] is copied field by field into an [`Event`], with the
//! start and end strings resolved through [`cronofy_core::resolve`]. An
//! event whose boundaries cannot be resolved yields a [`NormalizeError`]
//! instead of aborting the whole page.

use std::fmt;
use std::sync::LazyLock;

use cronofy_core::{DateFormatError, resolve};
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::model::{Attendee, Calendar, Event, EventOptions, Organizer, Pages};
use crate::raw_event::{RawAttendee, RawCalendar, RawEvent, RawOptions, RawOrganizer, RawPages};

/// Line breaks inside a location description.
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("Invalid line break regex"));

/// Which boundary of an event failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeField {
    Start,
    End,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// An event whose start or end is neither a timestamp nor a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event {event_uid:?} in calendar {calendar_id:?}: bad {field}: {source}")]
pub struct NormalizeError {
    /// UID of the offending event.
    pub event_uid: String,
    /// Calendar of the offending event.
    pub calendar_id: String,
    /// The boundary that failed.
    pub field: TimeField,
    /// The parse failure, carrying the raw value.
    #[source]
    pub source: DateFormatError,
}

impl NormalizeError {
    /// Returns the raw value that could not be parsed.
    pub fn value(&self) -> &str {
        &self.source.value
    }
}

/// Collapses line breaks to a space and drops commas.
pub fn flatten_location(description: &str) -> String {
    LINE_BREAK.replace_all(description, " ").replace(',', "")
}

/// Builds an [`Event`] from its wire shape.
pub(crate) fn normalize_event(raw: RawEvent) -> Result<Event, NormalizeError> {
    let event_uid = raw.event_uid.unwrap_or_default();
    let calendar_id = raw.calendar_id.unwrap_or_default();
    let start = raw.start.unwrap_or_default();
    let end = raw.end.unwrap_or_default();

    let fail = |field, source| NormalizeError {
        event_uid: event_uid.clone(),
        calendar_id: calendar_id.clone(),
        field,
        source,
    };
    let resolved_start = resolve(&start).map_err(|e| fail(TimeField::Start, e))?;
    let resolved_end = resolve(&end).map_err(|e| fail(TimeField::End, e))?;

    Ok(Event {
        calendar_id,
        event_uid,
        summary: raw.summary.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        start,
        end,
        deleted: raw.deleted.unwrap_or_default(),
        created: raw.created,
        updated: raw.updated,
        location_description: raw
            .location
            .and_then(|loc| loc.description)
            .unwrap_or_default(),
        participation_status: raw.participation_status.unwrap_or_default(),
        attendees: raw
            .attendees
            .unwrap_or_default()
            .into_iter()
            .map(Attendee::from)
            .collect(),
        organizer: raw.organizer.map(Organizer::from).unwrap_or_default(),
        transparency: raw.transparency.unwrap_or_default(),
        status: raw.status.unwrap_or_default(),
        categories: raw.categories.unwrap_or_default(),
        recurring: raw.recurring.unwrap_or_default(),
        event_private: raw.event_private.unwrap_or_default(),
        options: raw.options.map(EventOptions::from).unwrap_or_default(),
        start_time: resolved_start.instant,
        end_time: resolved_end.instant,
        all_day: resolved_start.all_day,
    })
}

impl From<RawCalendar> for Calendar {
    fn from(raw: RawCalendar) -> Self {
        Self {
            provider_name: raw.provider_name.unwrap_or_default(),
            profile_id: raw.profile_id.unwrap_or_default(),
            profile_name: raw.profile_name.unwrap_or_default(),
            calendar_id: raw.calendar_id.unwrap_or_default(),
            calendar_name: raw.calendar_name.unwrap_or_default(),
            read_only: raw.calendar_readonly.unwrap_or_default(),
            deleted: raw.calendar_deleted.unwrap_or_default(),
        }
    }
}

impl From<RawPages> for Pages {
    fn from(raw: RawPages) -> Self {
        Self {
            current: raw.current.unwrap_or_default(),
            total: raw.total.unwrap_or_default(),
            next_page: raw.next_page,
        }
    }
}

impl From<RawAttendee> for Attendee {
    fn from(raw: RawAttendee) -> Self {
        Self {
            email: raw.email.unwrap_or_default(),
            display_name: raw.display_name.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
        }
    }
}

impl From<RawOrganizer> for Organizer {
    fn from(raw: RawOrganizer) -> Self {
        Self {
            email: raw.email.unwrap_or_default(),
            display_name: raw.display_name.unwrap_or_default(),
        }
    }
}

impl From<RawOptions> for EventOptions {
    fn from(raw: RawOptions) -> Self {
        Self {
            delete: raw.delete.unwrap_or_default(),
            update: raw.update.unwrap_or_default(),
            change_participation_status: raw.change_participation_status.unwrap_or_default(),
        }
    }
}

/// Normalizes a page of events, keeping failures apart from the good ones.
pub(crate) fn normalize_events(raw_events: Vec<RawEvent>) -> (Vec<Event>, Vec<NormalizeError>) {
    let mut events = Vec::with_capacity(raw_events.len());
    let mut failures = Vec::new();

    for raw in raw_events {
        match normalize_event(raw) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(
                    event_uid = %err.event_uid,
                    field = %err.field,
                    value = %err.value(),
                    "skipping event with unparseable time"
                );
                failures.push(err);
            }
        }
    }

    (events, failures)
}
