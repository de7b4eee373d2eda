//! Typed slots for aggregate results
//!
//! Every query in one aggregate resolves to the same `Fetched` type; callers
//! take a slot back out by name and expected shape.

use crate::application::aggregate::Combined;
use crate::domain::entities::{Manufacturer, Vehicle, VehicleInstance, VehicleType};
use crate::domain::ports::StoreError;
use crate::domain::services::{DeleteCheck, Dependents};
use crate::error::{CatalogError, CatalogResult};

pub(crate) trait Slot: Sized {
    fn from_fetched(fetched: Fetched) -> Option<Self>;
}

macro_rules! fetched_shapes {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        #[derive(Debug)]
        pub(crate) enum Fetched {
            $($variant($ty)),*
        }

        $(
            impl From<$ty> for Fetched {
                fn from(value: $ty) -> Self {
                    Fetched::$variant(value)
                }
            }

            impl Slot for $ty {
                fn from_fetched(fetched: Fetched) -> Option<Self> {
                    match fetched {
                        Fetched::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

fetched_shapes! {
    Manufacturer(Option<Manufacturer>),
    Manufacturers(Vec<Manufacturer>),
    VehicleType(Option<VehicleType>),
    VehicleTypes(Vec<VehicleType>),
    Vehicle(Option<Vehicle>),
    Vehicles(Vec<Vehicle>),
    Instance(Option<VehicleInstance>),
    Instances(Vec<VehicleInstance>),
    Count(usize),
    Found(bool),
    Check(DeleteCheck),
    Dependents(Option<Dependents>),
}

/// Take slot `name` as `T`.
pub(crate) fn take<T: Slot>(combined: &mut Combined<Fetched>, name: &str) -> CatalogResult<T> {
    combined
        .take(name)
        .and_then(T::from_fetched)
        .ok_or_else(|| {
            CatalogError::Store(StoreError::TaskFailed {
                message: format!("aggregate slot '{}' missing or of the wrong shape", name),
            })
        })
}
