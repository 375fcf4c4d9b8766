//! Core types: event time resolution, request ranges, tracing setup

pub mod time;
pub mod tracing;

pub use self::time::{
    DateBound, DateFormatError, ResolvedTime, TimeWindow, format_wire_timestamp, resolve,
};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
