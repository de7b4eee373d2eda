//! Common test utilities for autolot scenario tests.
//!
//! This module provides:
//! - `TestEnv`: isolated working, config and data directories
//! - `TestResult`: captured output of one CLI run

pub mod env;

pub use env::*;
