//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `wsrelay` application.
//!
//! This module centralizes the error types and the logging setup so that
//! every other module reports problems the same way.

pub mod error;
pub mod logging;

#[cfg(test)]
pub(crate) mod capture;
