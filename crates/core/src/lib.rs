#![forbid(unsafe_code)]

pub mod model;
pub mod query;
pub mod scoring;
pub mod taxonomy;
pub mod time;

pub use time::{Clock, DayZone};
