//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::auth::Credential;
use crate::domain::types::VehicleId;
use crate::domain::vehicle::{Vehicle, VehicleFields, VehiclePage};
use crate::repository::errors::RepositoryResult;
use crate::repository::{VehicleListQuery, VehicleReader, VehicleWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl VehicleReader for Repository {
        async fn list_vehicles(
            &self,
            credential: &Credential,
            query: &VehicleListQuery,
        ) -> RepositoryResult<VehiclePage>;
    }

    #[async_trait]
    impl VehicleWriter for Repository {
        async fn create_vehicle(
            &self,
            credential: &Credential,
            fields: &VehicleFields,
        ) -> RepositoryResult<Vehicle>;
        async fn update_vehicle(
            &self,
            credential: &Credential,
            id: VehicleId,
            fields: &VehicleFields,
        ) -> RepositoryResult<Vehicle>;
        async fn delete_vehicle(&self, credential: &Credential, id: VehicleId) -> RepositoryResult<()>;
    }
}
