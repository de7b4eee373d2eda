//! Entity command handlers
//!
//! `list`, `show`, `create`, `update`, `delete` and `form` for each of
//! the four collections.

use anyhow::{bail, Result};

use autolot::config::OutputFormat;
use autolot::domain::services::DeleteTarget;
use autolot::domain::validation::FieldMap;
use autolot::domain::value_objects::{EntityId, EntityKind, InstanceStatus};
use autolot::presentation::{render, EntityAction, WriteAction, WriteReceipt};
use autolot::CatalogService;

use super::emit;

pub async fn cmd_entity(
    service: &CatalogService,
    kind: EntityKind,
    action: &EntityAction,
    format: OutputFormat,
) -> Result<()> {
    let rendered = match action {
        EntityAction::List { status } => list(service, kind, *status, format).await?,
        EntityAction::Show { id } => show(service, kind, *id, format).await?,
        EntityAction::Create { fields } => {
            let input = parse_fields(fields)?;
            let receipt = create(service, kind, &input).await?;
            render(&receipt, format)
        }
        EntityAction::Update { id, fields } => {
            let input = parse_fields(fields)?;
            update(service, kind, *id, &input).await?;
            render(&receipt(WriteAction::Updated, kind, *id), format)
        }
        EntityAction::Delete { id, preview: true } => {
            let preview = service.delete_preview(DeleteTarget::new(kind, *id)).await?;
            render(&preview, format)
        }
        EntityAction::Delete { id, preview: false } => {
            service.delete(DeleteTarget::new(kind, *id)).await?;
            let receipt = WriteReceipt {
                url: None,
                ..receipt(WriteAction::Deleted, kind, *id)
            };
            render(&receipt, format)
        }
        EntityAction::Form { id } => form(service, kind, *id, format).await?,
    };
    emit(&rendered, format);
    Ok(())
}

fn parse_fields(fields: &[String]) -> Result<FieldMap> {
    FieldMap::from_pairs(fields).map_err(anyhow::Error::msg)
}

fn receipt(action: WriteAction, kind: EntityKind, id: EntityId) -> WriteReceipt {
    WriteReceipt {
        action,
        kind,
        id,
        url: Some(kind.url_for(&id)),
    }
}

async fn list(
    service: &CatalogService,
    kind: EntityKind,
    status: Option<InstanceStatus>,
    format: OutputFormat,
) -> Result<String> {
    if status.is_some() && kind != EntityKind::VehicleInstance {
        bail!("--status only applies to vehicle instances");
    }
    Ok(match kind {
        EntityKind::Manufacturer => render(&service.list_manufacturers().await?, format),
        EntityKind::VehicleType => render(&service.list_vehicle_types().await?, format),
        EntityKind::Vehicle => render(&service.list_vehicles().await?, format),
        EntityKind::VehicleInstance => render(&service.list_instances(status).await?, format),
    })
}

async fn show(
    service: &CatalogService,
    kind: EntityKind,
    id: EntityId,
    format: OutputFormat,
) -> Result<String> {
    Ok(match kind {
        EntityKind::Manufacturer => render(&service.manufacturer_detail(id).await?, format),
        EntityKind::VehicleType => render(&service.vehicle_type_detail(id).await?, format),
        EntityKind::Vehicle => render(&service.vehicle_detail(id).await?, format),
        EntityKind::VehicleInstance => render(&service.instance_detail(id).await?, format),
    })
}

async fn create(
    service: &CatalogService,
    kind: EntityKind,
    input: &FieldMap,
) -> Result<WriteReceipt> {
    let (action, id) = match kind {
        EntityKind::Manufacturer => {
            let outcome = service.create_manufacturer(input).await?;
            (created_or_existing(outcome.is_created()), outcome.record().id)
        }
        EntityKind::VehicleType => {
            let outcome = service.create_vehicle_type(input).await?;
            (created_or_existing(outcome.is_created()), outcome.record().id)
        }
        EntityKind::Vehicle => (WriteAction::Created, service.create_vehicle(input).await?.id),
        EntityKind::VehicleInstance => {
            (WriteAction::Created, service.create_instance(input).await?.id)
        }
    };
    Ok(receipt(action, kind, id))
}

fn created_or_existing(created: bool) -> WriteAction {
    if created {
        WriteAction::Created
    } else {
        WriteAction::Existing
    }
}

async fn update(
    service: &CatalogService,
    kind: EntityKind,
    id: EntityId,
    input: &FieldMap,
) -> Result<()> {
    match kind {
        EntityKind::Manufacturer => {
            service.update_manufacturer(id, input).await?;
        }
        EntityKind::VehicleType => {
            service.update_vehicle_type(id, input).await?;
        }
        EntityKind::Vehicle => {
            service.update_vehicle(id, input).await?;
        }
        EntityKind::VehicleInstance => {
            service.update_instance(id, input).await?;
        }
    }
    Ok(())
}

async fn form(
    service: &CatalogService,
    kind: EntityKind,
    id: Option<EntityId>,
    format: OutputFormat,
) -> Result<String> {
    match kind {
        EntityKind::Vehicle => Ok(render(&service.vehicle_form(id).await?, format)),
        EntityKind::VehicleInstance => Ok(render(&service.instance_form(id).await?, format)),
        EntityKind::Manufacturer | EntityKind::VehicleType => {
            bail!("{} forms have no reference fields to choose from", kind)
        }
    }
}
