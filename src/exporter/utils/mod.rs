//! Shared helpers for the exporter: downloads and filesystem operations.

pub mod fs;
pub mod http;
