//! # API Shared
//!
//! Wire types for the symptom checker HTTP API.
//!
//! Contains:
//! - Request/response bodies (`dto` module), with OpenAPI schemas
//! - The health payload (`HealthService`)
//!
//! Field names here are part of the public contract: the web frontend and the legacy
//! conversational platform both depend on them, so renames must go through serde attributes.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
