//! Property tests for autolot.
//!
//! Properties use randomized input generation to protect invariants of the
//! write boundary: escaping is total, normalization preserves values and
//! validation never panics.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/escaping.rs"]
mod escaping;

#[path = "properties/normalization.rs"]
mod normalization;

#[path = "properties/validation.rs"]
mod validation;
