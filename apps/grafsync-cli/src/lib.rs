//! grafsync CLI library
//!
//! Exposes the command implementations for integration testing.
//! The binary entry point lives in main.rs.

pub mod commands;
pub mod error;
pub mod logging;
