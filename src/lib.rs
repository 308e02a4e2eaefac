//! Recron - Recurring-job administration engine
//!
//! Given untyped, string-encoded input (type name, method name, argument
//! values, argument type names, cron text), the engine resolves a concrete
//! invocable method signature against a pre-scanned type catalog, coerces
//! the values into correctly-typed arguments, validates the schedule and
//! atomically registers (or starts/stops/removes) a named recurring job in
//! an external job store. Execution of the jobs is entirely the host
//! scheduler's business.

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod app_info;
pub mod boot;
pub mod catalog;
pub mod cli;
pub mod coerce;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod jobs;
pub mod resolve;
pub mod router;
pub mod schedule;
pub mod setup_tracing;
