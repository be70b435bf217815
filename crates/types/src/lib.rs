/// Shared types for the Strata pricing engine
///
/// This crate provides the error taxonomy, constants and host-facing record
/// shapes used by the math and core crates.

pub mod constants;
pub mod errors;
pub mod records;

// Re-export all public types
pub use constants::*;
pub use errors::*;
pub use records::*;

/// Result type alias using the shared error type
pub type StrataResult<T> = std::result::Result<T, StrataError>;
