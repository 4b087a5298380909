//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: identifier of the hosted model an agent prefers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
