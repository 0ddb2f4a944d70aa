//! Core library for the symptom triage service.
//!
//! The `workflows::triage` module holds the deterministic severity engine and
//! the service facade that steers AI-generated care reports; `config`,
//! `telemetry`, and `error` carry the runtime scaffolding shared with the API
//! binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
