//! Wire shapes of the API responses.
//!
//! Bodies are deserialized into these types first; [`crate::normalize`] then
//! builds the public [`crate::model`] values from them. Scalar fields are
//! optional here, nested objects included, because the API sends `null` as
//! readily as it omits a key.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::ParticipationStatus;

/// `GET /calendars` envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CalendarsEnvelope {
    pub calendars: Option<Vec<RawCalendar>>,
}

/// `GET /events` envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EventsEnvelope {
    pub pages: Option<RawPages>,
    pub events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPages {
    pub current: Option<u32>,
    pub total: Option<u32>,
    pub next_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawCalendar {
    pub provider_name: Option<String>,
    pub profile_id: Option<String>,
    pub profile_name: Option<String>,
    pub calendar_id: Option<String>,
    pub calendar_name: Option<String>,
    pub calendar_readonly: Option<bool>,
    pub calendar_deleted: Option<bool>,
}

/// The `location` object of an event.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawLocation {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawAttendee {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub status: Option<ParticipationStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawOrganizer {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawOptions {
    pub delete: Option<bool>,
    pub update: Option<bool>,
    pub change_participation_status: Option<bool>,
}

/// An event as delivered, before its boundaries are resolved.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEvent {
    pub calendar_id: Option<String>,
    pub event_uid: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub deleted: Option<bool>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub location: Option<RawLocation>,
    pub participation_status: Option<ParticipationStatus>,
    pub attendees: Option<Vec<RawAttendee>>,
    pub organizer: Option<RawOrganizer>,
    pub transparency: Option<String>,
    pub status: Option<String>,
    pub categories: Option<Vec<String>>,
    pub recurring: Option<bool>,
    pub event_private: Option<bool>,
    pub options: Option<RawOptions>,
}
