//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Wiring the service to its store adapter
//! - Output formatting (text/JSON)

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{Cli, Commands, EntityAction};
pub use factory::{build_repositories, build_service};
pub use output::{render, resolve_format, ErrorReport, Render, WriteAction, WriteReceipt};
