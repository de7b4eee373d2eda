//! Catalog Use Case
//!
//! Application-layer orchestration of the catalog: every write runs the
//! validation pipeline before touching storage, deletes go through the
//! integrity guard, and reads fan out through an aggregate before the
//! composer assembles the read model.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::fetched::{take, Fetched};
use super::outcome::CreateOutcome;
use crate::application::aggregate::Aggregate;
use crate::domain::entities::{
    Document, Manufacturer, ManufacturerFilter, Vehicle, VehicleDraft, VehicleFilter,
    VehicleInstance, VehicleInstanceFilter, VehicleType, VehicleTypeFilter,
};
use crate::domain::ports::{Repositories, Repository, SortOrder};
use crate::domain::services::{
    CatalogSummary, DeleteCheck, DeletePreview, DeleteTarget, Dependents, InstanceFormOptions,
    IntegrityGuard, ManufacturerDetail, ManufacturerView, ReadModelComposer, RecordView,
    VehicleDetail, VehicleFormOptions, VehicleInstanceDetail, VehicleInstanceView,
    VehicleTypeDetail, VehicleTypeView, VehicleView,
};
use crate::domain::validation::{
    validate_manufacturer, validate_vehicle, validate_vehicle_instance, validate_vehicle_type,
    FieldError, FieldMap, Rejection, Validated, ValidationOptions,
};
use crate::domain::value_objects::{EntityId, EntityKind, InstanceStatus};
use crate::error::{CatalogError, CatalogResult};

const MANUFACTURER_NAME_KEYS: &[&str] = &["name", "manufacturer"];
const MANUFACTURER_KEYS: &[&str] = &["manufacturer", "make"];
const VEHICLE_TYPE_KEYS: &[&str] = &["vehicle_types", "vehicleType", "vehicletype"];
const VEHICLE_KEYS: &[&str] = &["vehicle"];

type Lookup = CatalogResult<Fetched>;

fn find_one<D>(
    repo: &Arc<dyn Repository<D>>,
    id: EntityId,
) -> impl Future<Output = Lookup> + Send + 'static
where
    D: Document,
    Option<D>: Into<Fetched>,
{
    let repo = Arc::clone(repo);
    async move { Ok(repo.find_by_id(&id).await?.into()) }
}

fn find_all<D>(
    repo: &Arc<dyn Repository<D>>,
    filter: D::Filter,
) -> impl Future<Output = Lookup> + Send + 'static
where
    D: Document,
    Vec<D>: Into<Fetched>,
{
    let repo = Arc::clone(repo);
    async move { Ok(repo.find(&filter, Some(SortOrder::Ascending)).await?.into()) }
}

fn count<D: Document>(
    repo: &Arc<dyn Repository<D>>,
    filter: D::Filter,
) -> impl Future<Output = Lookup> + Send + 'static {
    let repo = Arc::clone(repo);
    async move { Ok(Fetched::Count(repo.count_where(&filter).await?)) }
}

/// The key the caller used for a field, falling back to its canonical name.
fn key_used(input: &FieldMap, keys: &[&str]) -> String {
    keys.iter()
        .find(|key| input.contains_key(key))
        .or_else(|| keys.first())
        .map(|key| key.to_string())
        .unwrap_or_default()
}

fn reject(kind: EntityKind, input: &FieldMap, errors: Vec<FieldError>) -> CatalogError {
    warn!(kind = %kind, errors = errors.len(), "rejected input");
    CatalogError::ValidationFailed {
        kind,
        rejection: Rejection::new(input, errors),
    }
}

fn validated<D>(kind: EntityKind, validated: Validated<D>) -> CatalogResult<D> {
    match validated {
        Validated::Valid(draft) => Ok(draft),
        Validated::Invalid(rejection) => {
            warn!(kind = %kind, errors = rejection.errors.len(), "rejected input");
            Err(CatalogError::ValidationFailed { kind, rejection })
        }
    }
}

fn vehicle_reference_errors(
    input: &FieldMap,
    draft: &VehicleDraft,
    manufacturer: Option<Manufacturer>,
    known_types: &[VehicleType],
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if manufacturer.is_none() {
        errors.push(FieldError::new(
            key_used(input, MANUFACTURER_KEYS),
            "Manufacturer does not exist.",
        ));
    }
    let unknown_type = draft
        .vehicle_types
        .iter()
        .any(|id| !known_types.iter().any(|t| t.id == *id));
    if unknown_type {
        errors.push(FieldError::new(
            key_used(input, VEHICLE_TYPE_KEYS),
            "Vehicle type does not exist.",
        ));
    }
    errors
}

#[derive(Clone)]
pub struct CatalogService {
    repos: Repositories,
    guard: IntegrityGuard,
    options: ValidationOptions,
}

impl CatalogService {
    pub fn new(repos: Repositories) -> Self {
        Self::with_options(repos, ValidationOptions::default())
    }

    pub fn with_options(repos: Repositories, options: ValidationOptions) -> Self {
        Self {
            guard: IntegrityGuard::new(repos.clone()),
            repos,
            options,
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    // ---- create ----------------------------------------------------------

    pub async fn create_manufacturer(
        &self,
        input: &FieldMap,
    ) -> CatalogResult<CreateOutcome<Manufacturer>> {
        let draft = validated(
            EntityKind::Manufacturer,
            validate_manufacturer(input, &self.options),
        )?;

        let existing = self
            .repos
            .manufacturers
            .find(&ManufacturerFilter::Name(draft.name.clone()), None)
            .await?;
        if let Some(found) = existing.into_iter().next() {
            info!(id = %found.id, name = %found.name, "manufacturer already exists");
            return Ok(CreateOutcome::Existing(found));
        }

        let created = self.repos.manufacturers.insert(draft).await?;
        info!(id = %created.id, name = %created.name, "created manufacturer");
        Ok(CreateOutcome::Created(created))
    }

    pub async fn create_vehicle_type(
        &self,
        input: &FieldMap,
    ) -> CatalogResult<CreateOutcome<VehicleType>> {
        let draft = validated(EntityKind::VehicleType, validate_vehicle_type(input))?;

        let existing = self
            .repos
            .vehicle_types
            .find(&VehicleTypeFilter::Name(draft.name.clone()), None)
            .await?;
        if let Some(found) = existing.into_iter().next() {
            info!(id = %found.id, name = %found.name, "vehicle type already exists");
            return Ok(CreateOutcome::Existing(found));
        }

        let created = self.repos.vehicle_types.insert(draft).await?;
        info!(id = %created.id, name = %created.name, "created vehicle type");
        Ok(CreateOutcome::Created(created))
    }

    pub async fn create_vehicle(&self, input: &FieldMap) -> CatalogResult<Vehicle> {
        let draft = validated(EntityKind::Vehicle, validate_vehicle(input))?;

        let mut combined = Aggregate::new()
            .query(
                "manufacturer",
                find_one(&self.repos.manufacturers, draft.manufacturer),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .run()
            .await?;
        let errors = vehicle_reference_errors(
            input,
            &draft,
            take(&mut combined, "manufacturer")?,
            &take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?,
        );
        if !errors.is_empty() {
            return Err(reject(EntityKind::Vehicle, input, errors));
        }

        let created = self.repos.vehicles.insert(draft).await?;
        info!(id = %created.id, model = %created.model, "created vehicle");
        Ok(created)
    }

    pub async fn create_instance(&self, input: &FieldMap) -> CatalogResult<VehicleInstance> {
        let draft = validated(
            EntityKind::VehicleInstance,
            validate_vehicle_instance(input),
        )?;

        if self.repos.vehicles.find_by_id(&draft.vehicle).await?.is_none() {
            return Err(reject(
                EntityKind::VehicleInstance,
                input,
                vec![FieldError::new(
                    key_used(input, VEHICLE_KEYS),
                    "Vehicle does not exist.",
                )],
            ));
        }

        let created = self.repos.instances.insert(draft).await?;
        info!(id = %created.id, vehicle = %created.vehicle, status = %created.status, "created vehicle instance");
        Ok(created)
    }

    // ---- update ----------------------------------------------------------

    pub async fn update_manufacturer(
        &self,
        id: EntityId,
        input: &FieldMap,
    ) -> CatalogResult<Manufacturer> {
        let kind = EntityKind::Manufacturer;
        let draft = validated(kind, validate_manufacturer(input, &self.options))?;

        let mut combined = Aggregate::new()
            .query("target", find_one(&self.repos.manufacturers, id))?
            .query(
                "same_name",
                find_all(
                    &self.repos.manufacturers,
                    ManufacturerFilter::Name(draft.name.clone()),
                ),
            )?
            .run()
            .await?;
        if take::<Option<Manufacturer>>(&mut combined, "target")?.is_none() {
            return Err(CatalogError::not_found(kind, id));
        }
        let same_name: Vec<Manufacturer> = take(&mut combined, "same_name")?;
        if same_name.iter().any(|m| m.id != id) {
            return Err(reject(
                kind,
                input,
                vec![FieldError::new(
                    key_used(input, MANUFACTURER_NAME_KEYS),
                    "Manufacturer name is already in use.",
                )],
            ));
        }

        let updated = self
            .repos
            .manufacturers
            .replace(&id, draft)
            .await?
            .ok_or_else(|| CatalogError::not_found(kind, id))?;
        info!(id = %id, "updated manufacturer");
        Ok(updated)
    }

    pub async fn update_vehicle_type(
        &self,
        id: EntityId,
        input: &FieldMap,
    ) -> CatalogResult<VehicleType> {
        let kind = EntityKind::VehicleType;
        let draft = validated(kind, validate_vehicle_type(input))?;

        let mut combined = Aggregate::new()
            .query("target", find_one(&self.repos.vehicle_types, id))?
            .query(
                "same_name",
                find_all(
                    &self.repos.vehicle_types,
                    VehicleTypeFilter::Name(draft.name.clone()),
                ),
            )?
            .run()
            .await?;
        if take::<Option<VehicleType>>(&mut combined, "target")?.is_none() {
            return Err(CatalogError::not_found(kind, id));
        }
        let same_name: Vec<VehicleType> = take(&mut combined, "same_name")?;
        if same_name.iter().any(|t| t.id != id) {
            return Err(reject(
                kind,
                input,
                vec![FieldError::new("name", "Vehicle type name is already in use.")],
            ));
        }

        let updated = self
            .repos
            .vehicle_types
            .replace(&id, draft)
            .await?
            .ok_or_else(|| CatalogError::not_found(kind, id))?;
        info!(id = %id, "updated vehicle type");
        Ok(updated)
    }

    pub async fn update_vehicle(&self, id: EntityId, input: &FieldMap) -> CatalogResult<Vehicle> {
        let kind = EntityKind::Vehicle;
        let draft = validated(kind, validate_vehicle(input))?;

        let mut combined = Aggregate::new()
            .query("target", find_one(&self.repos.vehicles, id))?
            .query(
                "manufacturer",
                find_one(&self.repos.manufacturers, draft.manufacturer),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .run()
            .await?;
        if take::<Option<Vehicle>>(&mut combined, "target")?.is_none() {
            return Err(CatalogError::not_found(kind, id));
        }
        let errors = vehicle_reference_errors(
            input,
            &draft,
            take(&mut combined, "manufacturer")?,
            &take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?,
        );
        if !errors.is_empty() {
            return Err(reject(kind, input, errors));
        }

        let updated = self
            .repos
            .vehicles
            .replace(&id, draft)
            .await?
            .ok_or_else(|| CatalogError::not_found(kind, id))?;
        info!(id = %id, "updated vehicle");
        Ok(updated)
    }

    pub async fn update_instance(
        &self,
        id: EntityId,
        input: &FieldMap,
    ) -> CatalogResult<VehicleInstance> {
        let kind = EntityKind::VehicleInstance;
        let draft = validated(kind, validate_vehicle_instance(input))?;

        let mut combined = Aggregate::new()
            .query("target", find_one(&self.repos.instances, id))?
            .query("vehicle", find_one(&self.repos.vehicles, draft.vehicle))?
            .run()
            .await?;
        if take::<Option<VehicleInstance>>(&mut combined, "target")?.is_none() {
            return Err(CatalogError::not_found(kind, id));
        }
        if take::<Option<Vehicle>>(&mut combined, "vehicle")?.is_none() {
            return Err(reject(
                kind,
                input,
                vec![FieldError::new(
                    key_used(input, VEHICLE_KEYS),
                    "Vehicle does not exist.",
                )],
            ));
        }

        let updated = self
            .repos
            .instances
            .replace(&id, draft)
            .await?
            .ok_or_else(|| CatalogError::not_found(kind, id))?;
        info!(id = %id, status = %updated.status, "updated vehicle instance");
        Ok(updated)
    }

    // ---- delete ----------------------------------------------------------

    fn exists(&self, target: DeleteTarget) -> impl Future<Output = Lookup> + Send + 'static {
        let repos = self.repos.clone();
        async move {
            let id = target.id();
            let found = match target {
                DeleteTarget::Manufacturer(_) => repos.manufacturers.find_by_id(&id).await?.is_some(),
                DeleteTarget::VehicleType(_) => repos.vehicle_types.find_by_id(&id).await?.is_some(),
                DeleteTarget::Vehicle(_) => repos.vehicles.find_by_id(&id).await?.is_some(),
                DeleteTarget::VehicleInstance(_) => repos.instances.find_by_id(&id).await?.is_some(),
            };
            Ok(Fetched::Found(found))
        }
    }

    /// Physically remove a record once nothing references it.
    pub async fn delete(&self, target: DeleteTarget) -> CatalogResult<()> {
        let kind = target.kind();
        let id = target.id();
        let guard = self.guard.clone();

        let mut combined = Aggregate::new()
            .query("exists", self.exists(target))?
            .query("check", async move {
                Ok(Fetched::Check(guard.can_delete(&target).await?))
            })?
            .run()
            .await?;
        if !take::<bool>(&mut combined, "exists")? {
            return Err(CatalogError::not_found(kind, id));
        }
        if let DeleteCheck::Blocked(dependents) = take::<DeleteCheck>(&mut combined, "check")? {
            warn!(kind = %kind, id = %id, dependents = dependents.len(), "refused delete");
            return Err(CatalogError::IntegrityViolation {
                kind,
                id,
                dependents,
            });
        }

        let removed = match target {
            DeleteTarget::Manufacturer(id) => self.repos.manufacturers.delete(&id).await?,
            DeleteTarget::VehicleType(id) => self.repos.vehicle_types.delete(&id).await?,
            DeleteTarget::Vehicle(id) => self.repos.vehicles.delete(&id).await?,
            DeleteTarget::VehicleInstance(id) => self.repos.instances.delete(&id).await?,
        };
        if !removed {
            return Err(CatalogError::not_found(kind, id));
        }
        info!(kind = %kind, id = %id, "deleted");
        Ok(())
    }

    /// The record and its current dependents, for a delete confirmation.
    pub async fn delete_preview(
        &self,
        target: DeleteTarget,
    ) -> CatalogResult<DeletePreview<RecordView>> {
        debug!(kind = %target.kind(), id = %target.id(), "loading delete preview");
        let guard = self.guard.clone();
        let mut aggregate = Aggregate::new()
            .query("dependents", async move {
                Ok(Fetched::Dependents(guard.dependents(&target).await?))
            })?
            .query(
                "manufacturers",
                find_all(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .query("vehicles", find_all(&self.repos.vehicles, VehicleFilter::All))?;
        if let DeleteTarget::VehicleInstance(id) = target {
            aggregate = aggregate.query("instance", find_one(&self.repos.instances, id))?;
        }
        let mut combined = aggregate.run().await?;

        let dependents: Option<Dependents> = take(&mut combined, "dependents")?;
        let composer = ReadModelComposer::new()
            .with_manufacturers(take::<Vec<Manufacturer>>(&mut combined, "manufacturers")?)
            .with_vehicle_types(take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?)
            .with_vehicles(take::<Vec<Vehicle>>(&mut combined, "vehicles")?);

        let record = match target {
            DeleteTarget::Manufacturer(id) => composer
                .manufacturer_by_id(&id)
                .map(|m| RecordView::Manufacturer(composer.manufacturer(m))),
            DeleteTarget::VehicleType(id) => composer
                .vehicle_type_by_id(&id)
                .map(|t| RecordView::VehicleType(composer.vehicle_type(t))),
            DeleteTarget::Vehicle(id) => composer
                .vehicle_by_id(&id)
                .map(|v| RecordView::Vehicle(composer.vehicle(v))),
            DeleteTarget::VehicleInstance(_) => take::<Option<VehicleInstance>>(&mut combined, "instance")?
                .map(|i| RecordView::VehicleInstance(composer.instance(&i))),
        };
        let record = record.ok_or_else(|| CatalogError::not_found(target.kind(), target.id()))?;
        Ok(composer.delete_preview(record, dependents.as_ref()))
    }

    // ---- read ------------------------------------------------------------

    pub async fn manufacturer_detail(&self, id: EntityId) -> CatalogResult<ManufacturerDetail> {
        debug!(id = %id, "loading manufacturer detail");
        let mut combined = Aggregate::new()
            .query("manufacturer", find_one(&self.repos.manufacturers, id))?
            .query(
                "vehicles",
                find_all(&self.repos.vehicles, VehicleFilter::Manufacturer(id)),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .run()
            .await?;

        let manufacturer = take::<Option<Manufacturer>>(&mut combined, "manufacturer")?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Manufacturer, id))?;
        let vehicles: Vec<Vehicle> = take(&mut combined, "vehicles")?;
        let composer = ReadModelComposer::new()
            .with_manufacturers([manufacturer.clone()])
            .with_vehicle_types(take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?);

        Ok(ManufacturerDetail {
            manufacturer: composer.manufacturer(&manufacturer),
            vehicles: composer.vehicles(&vehicles),
        })
    }

    pub async fn vehicle_type_detail(&self, id: EntityId) -> CatalogResult<VehicleTypeDetail> {
        debug!(id = %id, "loading vehicle type detail");
        let mut combined = Aggregate::new()
            .query("vehicle_type", find_one(&self.repos.vehicle_types, id))?
            .query(
                "vehicles",
                find_all(&self.repos.vehicles, VehicleFilter::HasVehicleType(id)),
            )?
            .query(
                "manufacturers",
                find_all(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .run()
            .await?;

        let vehicle_type = take::<Option<VehicleType>>(&mut combined, "vehicle_type")?
            .ok_or_else(|| CatalogError::not_found(EntityKind::VehicleType, id))?;
        let vehicles: Vec<Vehicle> = take(&mut combined, "vehicles")?;
        let composer = ReadModelComposer::new()
            .with_manufacturers(take::<Vec<Manufacturer>>(&mut combined, "manufacturers")?)
            .with_vehicle_types(take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?);

        Ok(VehicleTypeDetail {
            vehicle_type: composer.vehicle_type(&vehicle_type),
            vehicles: composer.vehicles(&vehicles),
        })
    }

    pub async fn vehicle_detail(&self, id: EntityId) -> CatalogResult<VehicleDetail> {
        debug!(id = %id, "loading vehicle detail");
        let mut combined = Aggregate::new()
            .query("vehicle", find_one(&self.repos.vehicles, id))?
            .query(
                "instances",
                find_all(&self.repos.instances, VehicleInstanceFilter::Vehicle(id)),
            )?
            .query(
                "manufacturers",
                find_all(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .run()
            .await?;

        let vehicle = take::<Option<Vehicle>>(&mut combined, "vehicle")?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Vehicle, id))?;
        let instances: Vec<VehicleInstance> = take(&mut combined, "instances")?;
        let composer = ReadModelComposer::new()
            .with_manufacturers(take::<Vec<Manufacturer>>(&mut combined, "manufacturers")?)
            .with_vehicle_types(take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?)
            .with_vehicles([vehicle.clone()]);

        Ok(VehicleDetail {
            vehicle: composer.vehicle(&vehicle),
            instances: composer.instances(&instances),
        })
    }

    pub async fn instance_detail(&self, id: EntityId) -> CatalogResult<VehicleInstanceDetail> {
        debug!(id = %id, "loading vehicle instance detail");
        let mut combined = Aggregate::new()
            .query("instance", find_one(&self.repos.instances, id))?
            .query("vehicles", find_all(&self.repos.vehicles, VehicleFilter::All))?
            .query(
                "manufacturers",
                find_all(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .run()
            .await?;

        let instance = take::<Option<VehicleInstance>>(&mut combined, "instance")?
            .ok_or_else(|| CatalogError::not_found(EntityKind::VehicleInstance, id))?;
        let composer = ReadModelComposer::new()
            .with_vehicles(take::<Vec<Vehicle>>(&mut combined, "vehicles")?)
            .with_manufacturers(take::<Vec<Manufacturer>>(&mut combined, "manufacturers")?);
        let manufacturer = composer
            .vehicle_by_id(&instance.vehicle)
            .and_then(|v| composer.manufacturer_summary(&v.manufacturer));

        Ok(VehicleInstanceDetail {
            instance: composer.instance(&instance),
            manufacturer,
        })
    }

    pub async fn list_manufacturers(&self) -> CatalogResult<Vec<ManufacturerView>> {
        let records = self
            .repos
            .manufacturers
            .find(&ManufacturerFilter::All, Some(SortOrder::Ascending))
            .await?;
        debug!(count = records.len(), "listed manufacturers");
        let composer = ReadModelComposer::new();
        Ok(records.iter().map(|m| composer.manufacturer(m)).collect())
    }

    pub async fn list_vehicle_types(&self) -> CatalogResult<Vec<VehicleTypeView>> {
        let records = self
            .repos
            .vehicle_types
            .find(&VehicleTypeFilter::All, Some(SortOrder::Ascending))
            .await?;
        debug!(count = records.len(), "listed vehicle types");
        let composer = ReadModelComposer::new();
        Ok(records.iter().map(|t| composer.vehicle_type(t)).collect())
    }

    pub async fn list_vehicles(&self) -> CatalogResult<Vec<VehicleView>> {
        let mut combined = Aggregate::new()
            .query("vehicles", find_all(&self.repos.vehicles, VehicleFilter::All))?
            .query(
                "manufacturers",
                find_all(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .run()
            .await?;

        let vehicles: Vec<Vehicle> = take(&mut combined, "vehicles")?;
        debug!(count = vehicles.len(), "listed vehicles");
        let composer = ReadModelComposer::new()
            .with_manufacturers(take::<Vec<Manufacturer>>(&mut combined, "manufacturers")?)
            .with_vehicle_types(take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?);
        Ok(composer.vehicles(&vehicles))
    }

    pub async fn list_instances(
        &self,
        status: Option<InstanceStatus>,
    ) -> CatalogResult<Vec<VehicleInstanceView>> {
        let filter = match status {
            Some(status) => VehicleInstanceFilter::Status(status),
            None => VehicleInstanceFilter::All,
        };
        let mut combined = Aggregate::new()
            .query("instances", find_all(&self.repos.instances, filter))?
            .query("vehicles", find_all(&self.repos.vehicles, VehicleFilter::All))?
            .run()
            .await?;

        let instances: Vec<VehicleInstance> = take(&mut combined, "instances")?;
        debug!(count = instances.len(), "listed vehicle instances");
        let composer =
            ReadModelComposer::new().with_vehicles(take::<Vec<Vehicle>>(&mut combined, "vehicles")?);
        Ok(composer.instances(&instances))
    }

    /// Choices for the vehicle create form, or the update form of `id`.
    pub async fn vehicle_form(&self, id: Option<EntityId>) -> CatalogResult<VehicleFormOptions> {
        let mut aggregate = Aggregate::new()
            .query(
                "manufacturers",
                find_all(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .query(
                "vehicle_types",
                find_all(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?;
        if let Some(id) = id {
            aggregate = aggregate.query("vehicle", find_one(&self.repos.vehicles, id))?;
        }
        let mut combined = aggregate.run().await?;

        let current = match id {
            Some(id) => Some(
                take::<Option<Vehicle>>(&mut combined, "vehicle")?
                    .ok_or_else(|| CatalogError::not_found(EntityKind::Vehicle, id))?,
            ),
            None => None,
        };
        let composer = ReadModelComposer::new()
            .with_manufacturers(take::<Vec<Manufacturer>>(&mut combined, "manufacturers")?)
            .with_vehicle_types(take::<Vec<VehicleType>>(&mut combined, "vehicle_types")?);
        Ok(composer.vehicle_form(current.as_ref()))
    }

    pub async fn instance_form(&self, id: Option<EntityId>) -> CatalogResult<InstanceFormOptions> {
        let mut aggregate = Aggregate::new()
            .query("vehicles", find_all(&self.repos.vehicles, VehicleFilter::All))?;
        if let Some(id) = id {
            aggregate = aggregate.query("instance", find_one(&self.repos.instances, id))?;
        }
        let mut combined = aggregate.run().await?;

        let current = match id {
            Some(id) => Some(
                take::<Option<VehicleInstance>>(&mut combined, "instance")?
                    .ok_or_else(|| CatalogError::not_found(EntityKind::VehicleInstance, id))?,
            ),
            None => None,
        };
        let composer =
            ReadModelComposer::new().with_vehicles(take::<Vec<Vehicle>>(&mut combined, "vehicles")?);
        Ok(composer.instance_form(current.as_ref()))
    }

    /// Record counts for the catalog home screen.
    pub async fn summary(&self) -> CatalogResult<CatalogSummary> {
        let mut combined = Aggregate::new()
            .query(
                "manufacturers",
                count(&self.repos.manufacturers, ManufacturerFilter::All),
            )?
            .query(
                "vehicle_types",
                count(&self.repos.vehicle_types, VehicleTypeFilter::All),
            )?
            .query("vehicles", count(&self.repos.vehicles, VehicleFilter::All))?
            .query(
                "instances",
                count(&self.repos.instances, VehicleInstanceFilter::All),
            )?
            .query(
                "available_instances",
                count(
                    &self.repos.instances,
                    VehicleInstanceFilter::Status(InstanceStatus::Available),
                ),
            )?
            .run()
            .await?;

        Ok(CatalogSummary {
            manufacturers: take(&mut combined, "manufacturers")?,
            vehicle_types: take(&mut combined, "vehicle_types")?,
            vehicles: take(&mut combined, "vehicles")?,
            instances: take(&mut combined, "instances")?,
            available_instances: take(&mut combined, "available_instances")?,
        })
    }
}
