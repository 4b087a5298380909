//! Application-level configuration.
//!
//! - [`EngineParams`]: context window, failure policy and auto-play cadence

pub mod engine_params;

pub use engine_params::{EngineParams, FailurePolicy};
