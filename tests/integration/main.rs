//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. Everything runs in-process with no files or
//! clock except where a test creates its own scratch directory.

mod app_service_tests;
mod config_port_tests;
