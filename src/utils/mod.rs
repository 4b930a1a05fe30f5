//! The `utils` module provides the error types and logging setup shared
//! across the `subsink` application.

pub mod error;
pub mod logging;

pub use error::{OutputError, Result, SessionError};

#[cfg(test)]
mod tests;
