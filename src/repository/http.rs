//! `reqwest` implementation of the vehicle repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};

use crate::domain::auth::Credential;
use crate::domain::types::VehicleId;
use crate::domain::vehicle::{Vehicle, VehicleFields, VehiclePage};
use crate::models::config::ConsoleConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{VehicleListQuery, VehicleReader, VehicleWriter};

/// Talks to `{base_url}/vehicles/` with one request per call.
#[derive(Clone, Debug)]
pub struct HttpVehicleRepository {
    client: Client,
    base_url: String,
}

impl HttpVehicleRepository {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds a repository with a client honoring the configured timeout.
    pub fn from_config(config: &ConsoleConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RepositoryError::Unexpected(format!("Failed to build client: {e}")))?;
        Ok(Self::new(client, &config.api_base_url))
    }

    fn collection_url(&self) -> String {
        format!("{}/vehicles/", self.base_url)
    }

    fn item_url(&self, id: VehicleId) -> String {
        format!("{}/vehicles/{}/", self.base_url, id)
    }

    fn authorized(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> RepositoryResult<RequestBuilder> {
        if !credential.is_usable_at(Utc::now()) {
            return Err(RepositoryError::Auth(
                "Missing or expired credential".to_string(),
            ));
        }
        Ok(request.header(AUTHORIZATION, credential.header_value()))
    }

    async fn send(request: RequestBuilder) -> RepositoryResult<Response> {
        let response = request.send().await.map_err(|err| {
            log::error!("Vehicle request failed: {err}");
            RepositoryError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = RepositoryError::from_status(status, &body);
        log::error!("Vehicle request rejected with {status}: {err}");
        Err(err)
    }
}

#[async_trait]
impl VehicleReader for HttpVehicleRepository {
    async fn list_vehicles(
        &self,
        credential: &Credential,
        query: &VehicleListQuery,
    ) -> RepositoryResult<VehiclePage> {
        log::debug!(
            "GET vehicles page={} search={:?}",
            query.page,
            query.search
        );
        let page = query.page.to_string();
        let request = self
            .client
            .get(self.collection_url())
            .query(&[("page", page.as_str()), ("search", query.search.as_str())]);

        let response = Self::send(self.authorized(request, credential)?).await?;
        Ok(response.json::<VehiclePage>().await?)
    }
}

#[async_trait]
impl VehicleWriter for HttpVehicleRepository {
    async fn create_vehicle(
        &self,
        credential: &Credential,
        fields: &VehicleFields,
    ) -> RepositoryResult<Vehicle> {
        log::debug!("POST vehicle {}", fields.registration_number);
        let request = self.client.post(self.collection_url()).json(fields);

        let response = Self::send(self.authorized(request, credential)?).await?;
        Ok(response.json::<Vehicle>().await?)
    }

    async fn update_vehicle(
        &self,
        credential: &Credential,
        id: VehicleId,
        fields: &VehicleFields,
    ) -> RepositoryResult<Vehicle> {
        log::debug!("PUT vehicle {id}");
        let request = self.client.put(self.item_url(id)).json(fields);

        let response = Self::send(self.authorized(request, credential)?).await?;
        Ok(response.json::<Vehicle>().await?)
    }

    async fn delete_vehicle(&self, credential: &Credential, id: VehicleId) -> RepositoryResult<()> {
        log::debug!("DELETE vehicle {id}");
        let request = self.client.delete(self.item_url(id));

        Self::send(self.authorized(request, credential)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_keep_trailing_slash() {
        let repo = HttpVehicleRepository::new(Client::new(), "http://127.0.0.1:8000/api/");
        assert_eq!(repo.collection_url(), "http://127.0.0.1:8000/api/vehicles/");
        assert_eq!(
            repo.item_url(VehicleId::new(12).unwrap()),
            "http://127.0.0.1:8000/api/vehicles/12/"
        );
    }
}
