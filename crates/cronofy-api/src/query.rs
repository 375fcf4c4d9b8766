//! Query string encoding for the events listing.
//!
//! Encoding rules:
//! - unset fields (`None`, empty calendar list) are omitted entirely
//! - `calendar_ids` becomes one `calendar_ids[]` pair per id
//! - instants use the wire timestamp format, dates use `YYYY-MM-DD`
//! - `tzid` is always present
//!
//! Pair order follows field order but callers should not depend on it.

use chrono::{DateTime, Utc};
use cronofy_core::{DateBound, format_wire_timestamp};
use url::form_urlencoded;

/// Time zone used when none is given.
pub const DEFAULT_TZID: &str = "UTC";

/// Filters for `GET /events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsRequest {
    /// Restrict to these calendars; empty means all.
    pub calendar_ids: Vec<String>,
    /// Lower bound of the range.
    pub from: Option<DateBound>,
    /// Upper bound of the range.
    pub to: Option<DateBound>,
    pub include_deleted: Option<bool>,
    pub include_geo: Option<bool>,
    pub include_moved: Option<bool>,
    /// Only events changed since this instant.
    pub last_modified: Option<DateTime<Utc>>,
    pub localized_times: Option<bool>,
    pub only_managed: Option<bool>,
    /// IANA time zone the server uses to interpret dates.
    pub tzid: String,
}

impl Default for EventsRequest {
    fn default() -> Self {
        Self {
            calendar_ids: Vec::new(),
            from: None,
            to: None,
            include_deleted: None,
            include_geo: None,
            include_moved: None,
            last_modified: None,
            localized_times: None,
            only_managed: None,
            tzid: DEFAULT_TZID.to_string(),
        }
    }
}

impl EventsRequest {
    /// Creates a request with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to filter by calendar IDs.
    pub fn with_calendar_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calendar_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the range.
    pub fn with_range(mut self, from: impl Into<DateBound>, to: impl Into<DateBound>) -> Self {
        self.from = Some(from.into());
        self.to = Some(to.into());
        self
    }

    /// Builder method to set the time zone.
    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = tzid.into();
        self
    }

    /// Builder method to set the last-modified cursor.
    pub fn with_last_modified(mut self, since: DateTime<Utc>) -> Self {
        self.last_modified = Some(since);
        self
    }

    /// Builder method to include deleted events.
    pub fn with_include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = Some(include);
        self
    }

    /// Builder method to include geographic location data.
    pub fn with_include_geo(mut self, include: bool) -> Self {
        self.include_geo = Some(include);
        self
    }

    /// Builder method to include moved events.
    pub fn with_include_moved(mut self, include: bool) -> Self {
        self.include_moved = Some(include);
        self
    }

    /// Builder method to request localized times.
    pub fn with_localized_times(mut self, localized: bool) -> Self {
        self.localized_times = Some(localized);
        self
    }

    /// Builder method to restrict to events managed through the API.
    pub fn with_only_managed(mut self, only: bool) -> Self {
        self.only_managed = Some(only);
        self
    }

    /// Encodes the request as a URL query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        for id in &self.calendar_ids {
            query.append_pair("calendar_ids[]", id);
        }
        if let Some(ref from) = self.from {
            query.append_pair("from", &from.to_wire());
        }
        append_flag(&mut query, "include_deleted", self.include_deleted);
        append_flag(&mut query, "include_geo", self.include_geo);
        append_flag(&mut query, "include_moved", self.include_moved);
        if let Some(ref since) = self.last_modified {
            query.append_pair("last_modified", &format_wire_timestamp(since));
        }
        append_flag(&mut query, "localized_times", self.localized_times);
        append_flag(&mut query, "only_managed", self.only_managed);
        query.append_pair("tzid", &self.tzid);
        if let Some(ref to) = self.to {
            query.append_pair("to", &to.to_wire());
        }

        query.finish()
    }
}

fn append_flag(query: &mut form_urlencoded::Serializer<'_, String>, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        query.append_pair(key, if value { "true" } else { "false" });
    }
}
