//! # API Shared
//!
//! Wire-level definitions for the EHR APIs.
//!
//! Contains:
//! - Request/response bodies with OpenAPI schemas (`wire` module)
//! - Shared services like `HealthService`
//!
//! The types here describe the JSON contract only; validation and domain rules live in
//! `ehr-core`.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
