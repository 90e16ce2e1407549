//! # Verdant
//!
//! HTTP API, CLI and configuration for the Verdant carbon-credit platform.
//! All view logic lives in `verdant-core`; this crate exposes it over JSON
//! and on the command line, and owns the upload processing timer.

pub mod api;
pub mod cli;
pub mod config;
pub mod review;
