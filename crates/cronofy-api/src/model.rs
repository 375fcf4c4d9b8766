//! Domain types returned by the client.
//!
//! These are plain values: once returned, the client keeps no reference to
//! them. [`Event`] is built from the wire shape in [`crate::raw_event`] by
//! [`crate::normalize`], which also fills in the resolved boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizeError, flatten_location};

/// A calendar made available by one of the linked provider profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calendar {
    /// Provider name, e.g. "google".
    pub provider_name: String,
    /// Profile identifier.
    pub profile_id: String,
    /// Profile display name.
    pub profile_name: String,
    /// Calendar identifier, unique within a profile.
    pub calendar_id: String,
    /// Calendar display name.
    pub calendar_name: String,
    /// Whether events can be written to this calendar.
    #[serde(rename = "calendar_readonly")]
    pub read_only: bool,
    /// Whether the calendar has been deleted at the provider.
    #[serde(rename = "calendar_deleted")]
    pub deleted: bool,
}

/// Pagination metadata of an events listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pages {
    /// Current page, 1-based.
    pub current: u32,
    /// Total number of pages.
    pub total: u32,
    /// Absolute URL of the next page, if there is one.
    pub next_page: Option<String>,
}

impl Pages {
    /// Returns true if another page is available.
    pub fn has_next(&self) -> bool {
        self.next_page.as_deref().is_some_and(|next| !next.is_empty())
    }
}

/// The RSVP state of an attendee, or of the account owner for an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    /// Accepted the invitation.
    Accepted,
    /// Declined the invitation.
    Declined,
    /// Has not responded yet.
    NeedsAction,
    /// Tentatively accepted.
    Tentative,
    /// Missing or not recognised.
    #[default]
    #[serde(other)]
    Unknown,
}

/// An event attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendee {
    pub email: String,
    pub display_name: String,
    pub status: ParticipationStatus,
}

/// The event organizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organizer {
    pub email: String,
    pub display_name: String,
}

/// Operations the account is permitted to perform on an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventOptions {
    pub delete: bool,
    pub update: bool,
    pub change_participation_status: bool,
}

/// A calendar event with resolved boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Calendar the event belongs to.
    pub calendar_id: String,
    /// Identifier, stable within the calendar.
    pub event_uid: String,
    pub summary: String,
    pub description: String,
    /// Start value exactly as delivered.
    pub start: String,
    /// End value exactly as delivered.
    pub end: String,
    pub deleted: bool,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Location text exactly as delivered; see [`Event::location`].
    pub location_description: String,
    pub participation_status: ParticipationStatus,
    pub attendees: Vec<Attendee>,
    pub organizer: Organizer,
    pub transparency: String,
    pub status: String,
    pub categories: Vec<String>,
    pub recurring: bool,
    pub event_private: bool,
    pub options: EventOptions,
    /// Resolved start instant; midnight UTC for date-only values.
    pub start_time: DateTime<Utc>,
    /// Resolved end instant; midnight UTC for date-only values.
    pub end_time: DateTime<Utc>,
    /// True when the start carried no time of day.
    pub all_day: bool,
}

impl Event {
    /// Returns true if the account accepted this event.
    pub fn accepted(&self) -> bool {
        self.participation_status == ParticipationStatus::Accepted
    }

    /// Returns true if the account declined this event.
    pub fn declined(&self) -> bool {
        self.participation_status == ParticipationStatus::Declined
    }

    /// Returns true if the account tentatively accepted this event.
    pub fn is_tentative(&self) -> bool {
        self.participation_status == ParticipationStatus::Tentative
    }

    /// Location as a single line with commas removed.
    pub fn location(&self) -> String {
        flatten_location(&self.location_description)
    }
}

/// One page of an events listing.
///
/// Events whose start or end could not be resolved are left out of `events`
/// and reported in `failures` instead.
#[derive(Debug, Clone, Default)]
pub struct EventsResponse {
    /// Pagination metadata.
    pub pages: Pages,
    /// Successfully normalized events, in server order.
    pub events: Vec<Event>,
    /// Events that could not be normalized.
    pub failures: Vec<NormalizeError>,
}

impl EventsResponse {
    /// Returns true if every event on the page was normalized.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the events, or the first normalization failure.
    pub fn into_strict(self) -> crate::error::ApiResult<Vec<Event>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.into()),
            None => Ok(self.events),
        }
    }
}
