//! Trade journal: record normalization, the session portfolio, and the
//! aggregate metrics derived from it.

pub mod metrics;
pub mod portfolio;
pub mod projection;
pub mod record;
pub mod request;
pub mod strategy;
