//! # Urgency Application Library
//!
//! CLI, HTTP API, config loading and CSV I/O around `urgency-core`.
//! The binary in `main.rs` is a thin entry point over this library so the
//! integration tests can drive the same code.

pub mod api;
pub mod cli;
pub mod config;
pub mod io;
