//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `store/` - Repository implementations (memory, JSON files)

pub mod store;

pub use store::{JsonFileStore, MemoryStore};
