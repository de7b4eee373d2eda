//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod repository;

pub use repository::{Repositories, Repository, SortOrder, StoreError, StoreResult};
