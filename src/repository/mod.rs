use async_trait::async_trait;

use crate::domain::auth::Credential;
use crate::domain::types::VehicleId;
use crate::domain::vehicle::{Vehicle, VehicleFields, VehiclePage};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use http::HttpVehicleRepository;

/// Address of one list fetch: a 1-based page of the records matching `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleListQuery {
    pub page: usize,
    pub search: String,
}

impl Default for VehicleListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleListQuery {
    pub fn new() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Read side of the remote vehicle collection.
///
/// Implementations never cache and never retry.
#[async_trait]
pub trait VehicleReader: Send + Sync {
    async fn list_vehicles(
        &self,
        credential: &Credential,
        query: &VehicleListQuery,
    ) -> RepositoryResult<VehiclePage>;
}

/// Write side of the remote vehicle collection.
#[async_trait]
pub trait VehicleWriter: Send + Sync {
    async fn create_vehicle(
        &self,
        credential: &Credential,
        fields: &VehicleFields,
    ) -> RepositoryResult<Vehicle>;

    /// Replaces every editable field of the record; identity is preserved.
    async fn update_vehicle(
        &self,
        credential: &Credential,
        id: VehicleId,
        fields: &VehicleFields,
    ) -> RepositoryResult<Vehicle>;

    async fn delete_vehicle(&self, credential: &Credential, id: VehicleId)
    -> RepositoryResult<()>;
}
