//! Admin HTTP surface: handlers and wire types.
//!
//! Wire field names are PascalCase, matching the dashboard protocol the
//! engine was built for. Pipeline failures come back as HTTP 200 with
//! `{Status: false, Message}` — the transport succeeded, the request did not.

pub mod health_checks;
pub mod job_agent;
pub mod listing;
pub mod rescan;
pub mod response;
pub mod save_job;
