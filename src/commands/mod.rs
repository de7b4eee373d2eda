//! Command handlers for the `autolot` binary

mod entity;
mod summary;

pub use entity::cmd_entity;
pub use summary::cmd_summary;

use autolot::config::OutputFormat;

/// Write rendered output to stdout. Text already ends in a newline.
pub(crate) fn emit(rendered: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", rendered),
        OutputFormat::Json => println!("{}", rendered),
    }
}
