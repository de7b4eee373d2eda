//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --data-dir, --json, --verbose) are inherited by all subcommands
//! - Field input is repeated `-f key=value`; a repeated key builds a multi-valued field

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::{EntityId, EntityKind, InstanceStatus};

/// autolot - vehicle rental catalog
#[derive(Parser, Debug)]
#[command(name = "autolot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./autolot.toml, then the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory for the JSON store
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Output format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record counts across the catalog
    Summary,

    /// Manage manufacturers
    Manufacturer {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage vehicle types
    VehicleType {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage vehicles
    Vehicle {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage rentable vehicle instances
    Instance {
        #[command(subcommand)]
        action: EntityAction,
    },
}

impl Commands {
    /// The entity a subcommand addresses, if any.
    pub fn entity(&self) -> Option<(EntityKind, &EntityAction)> {
        match self {
            Commands::Summary => None,
            Commands::Manufacturer { action } => Some((EntityKind::Manufacturer, action)),
            Commands::VehicleType { action } => Some((EntityKind::VehicleType, action)),
            Commands::Vehicle { action } => Some((EntityKind::Vehicle, action)),
            Commands::Instance { action } => Some((EntityKind::VehicleInstance, action)),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EntityAction {
    /// List records sorted by name, model or due date
    List {
        /// Only instances with this status
        #[arg(long)]
        status: Option<InstanceStatus>,
    },

    /// Show one record with its related records
    Show { id: EntityId },

    /// Create a record from field values
    Create {
        /// Field value; repeat a key to pass several values
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Replace a record's fields
    Update {
        id: EntityId,

        /// Field value; repeat a key to pass several values
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Delete a record that nothing references
    Delete {
        id: EntityId,

        /// Show what blocks the delete without deleting
        #[arg(long)]
        preview: bool,
    },

    /// Choices for the create form, or the update form of ID
    Form { id: Option<EntityId> },
}
