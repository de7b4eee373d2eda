//! Summary command handler
//!
//! Prints record counts for every collection.

use anyhow::Result;

use autolot::config::OutputFormat;
use autolot::presentation::render;
use autolot::CatalogService;

use super::emit;

pub async fn cmd_summary(service: &CatalogService, format: OutputFormat) -> Result<()> {
    let summary = service.summary().await?;
    emit(&render(&summary, format), format);
    Ok(())
}
