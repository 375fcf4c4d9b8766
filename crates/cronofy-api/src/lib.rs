//! Client for the Cronofy calendar API.
//!
//! - [`CronofyClient`] - lists calendars and events
//! - [`EventsRequest`] - filters for the events listing, encoded into the query string
//! - [`Transport`] - the HTTP seam; [`ReqwestTransport`] is the default
//! - [`CallContext`] - per-call deadline and cancellation
//! - [`ApiError`] - transport, status, decode and date-format failures
//!
//! # Pipeline
//!
//! ```text
//!  EventsRequest ──to_query_string()──▶ URL
//!                                        │
//!                                        ▼  Transport::execute (bearer token)
//!                                   RawResponse
//!                                        │
//!                                        ▼  decode(): status >= 400 → ApiError::Status
//!                                   RawEvent ...
//!                                        │
//!                                        ▼  normalize: resolve start/end
//!                            Event ... + NormalizeError ...
//! ```

pub mod client;
pub mod context;
mod decode;
pub mod error;
pub mod model;
pub mod normalize;
pub mod query;
mod raw_event;
pub mod transport;

pub use client::{ClientConfig, CronofyClient, DEFAULT_BASE_URL};
pub use context::CallContext;
pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use model::{
    Attendee, Calendar, Event, EventOptions, EventsResponse, Organizer, Pages, ParticipationStatus,
};
pub use normalize::{NormalizeError, TimeField, flatten_location};
pub use query::{DEFAULT_TZID, EventsRequest};
pub use transport::{
    BoxFuture, RawResponse, ReqwestTransport, Transport, TransportConfig, TransportError,
    TransportErrorKind, TransportRequest,
};
