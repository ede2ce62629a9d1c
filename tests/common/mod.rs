#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration};
use tokio::sync::oneshot;

use pushkind_fleet::domain::auth::Credential;
use pushkind_fleet::domain::types::{
    BrandName, ChassisNumber, EngineNumber, ModelNumber, RegistrationNumber, Transmission,
    Variant, VehicleId, VehicleName, VehicleStatus, VehicleType,
};
use pushkind_fleet::domain::vehicle::{Vehicle, VehicleFields, VehiclePage};
use pushkind_fleet::repository::errors::{RepositoryError, RepositoryResult};
use pushkind_fleet::repository::{VehicleListQuery, VehicleReader, VehicleWriter};

pub const TOKEN: &str = "secret";

pub fn credential() -> Credential {
    Credential::new(TOKEN)
}

pub fn fields(brand: &str, n: i32) -> VehicleFields {
    VehicleFields {
        brand_name: BrandName::new(brand).unwrap(),
        vehicle_name: VehicleName::new(format!("Model {n}")).unwrap(),
        model_number: ModelNumber::new(format!("M-{n}")).unwrap(),
        registration_number: RegistrationNumber::new(format!("REG-{n}")).unwrap(),
        vehicle_type: VehicleType::Car,
        vehicle_subtype: None,
        variant: Variant::Standard,
        transmission: Transmission::Manual,
        chassis_number: ChassisNumber::new(format!("CH-{n}")).unwrap(),
        engine_number: EngineNumber::new(format!("EN-{n}")).unwrap(),
        description: None,
        status: VehicleStatus::Active,
    }
}

struct Server {
    vehicles: Vec<Vehicle>,
    next_id: i32,
    list_calls: Vec<VehicleListQuery>,
    gates: HashMap<String, oneshot::Receiver<()>>,
    fail_next_list: Option<RepositoryError>,
}

/// In-memory stand-in for the remote collection.
///
/// Lists newest first, searches brand, name and registration number, and
/// answers pages past the end with `NotFound` like the real service. A list
/// call takes its snapshot immediately but can be held back with [`gate`]
/// before it is delivered.
///
/// [`gate`]: InMemoryRepository::gate
pub struct InMemoryRepository {
    page_size: usize,
    server: Mutex<Server>,
}

impl InMemoryRepository {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            server: Mutex::new(Server {
                vehicles: Vec::new(),
                next_id: 1,
                list_calls: Vec::new(),
                gates: HashMap::new(),
                fail_next_list: None,
            }),
        }
    }

    /// Repository preloaded with `count` vehicles of brand `brand`.
    pub fn with_vehicles(page_size: usize, brand: &str, count: i32) -> Self {
        let repo = Self::new(page_size);
        for n in 0..count {
            repo.insert(fields(brand, n));
        }
        repo
    }

    pub fn insert(&self, fields: VehicleFields) -> Vehicle {
        let mut server = self.server.lock().unwrap();
        let id = VehicleId::new(server.next_id).unwrap();
        server.next_id += 1;
        let created_at = DateTime::parse_from_rfc3339("2025-01-01T08:00:00+00:00").unwrap()
            + Duration::days(i64::from(id.get()));
        let vehicle = fields.into_vehicle(id, Some(created_at));
        server.vehicles.push(vehicle.clone());
        vehicle
    }

    /// Holds back responses to list calls for `search` until the sender fires.
    pub fn gate(&self, search: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.server
            .lock()
            .unwrap()
            .gates
            .insert(search.to_string(), rx);
        tx
    }

    pub fn fail_next_list(&self, err: RepositoryError) {
        self.server.lock().unwrap().fail_next_list = Some(err);
    }

    pub fn list_calls(&self) -> Vec<VehicleListQuery> {
        self.server.lock().unwrap().list_calls.clone()
    }

    pub fn ids(&self) -> Vec<i32> {
        self.server
            .lock()
            .unwrap()
            .vehicles
            .iter()
            .map(|v| v.id.get())
            .collect()
    }

    fn check(credential: &Credential) -> RepositoryResult<()> {
        if credential.token() == TOKEN {
            Ok(())
        } else {
            Err(RepositoryError::Auth("Invalid token.".to_string()))
        }
    }

    fn snapshot(&self, server: &Server, query: &VehicleListQuery) -> RepositoryResult<VehiclePage> {
        let term = query.search.to_lowercase();
        let mut matching: Vec<Vehicle> = server
            .vehicles
            .iter()
            .filter(|v| {
                term.is_empty()
                    || v.brand_name.to_lowercase().contains(&term)
                    || v.vehicle_name.to_lowercase().contains(&term)
                    || v.registration_number.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        matching.sort_by_key(|v| std::cmp::Reverse(v.id.get()));

        let count = matching.len();
        let start = (query.page - 1) * self.page_size;
        if query.page > 1 && start >= count {
            return Err(RepositoryError::NotFound);
        }

        Ok(VehiclePage {
            results: matching.into_iter().skip(start).take(self.page_size).collect(),
            count,
            page_size: self.page_size,
        })
    }
}

#[async_trait]
impl VehicleReader for InMemoryRepository {
    async fn list_vehicles(
        &self,
        credential: &Credential,
        query: &VehicleListQuery,
    ) -> RepositoryResult<VehiclePage> {
        let (result, gate) = {
            let mut server = self.server.lock().unwrap();
            server.list_calls.push(query.clone());
            let result = match server.fail_next_list.take() {
                Some(err) => Err(err),
                None => Self::check(credential).and_then(|_| self.snapshot(&server, query)),
            };
            (result, server.gates.remove(&query.search))
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

#[async_trait]
impl VehicleWriter for InMemoryRepository {
    async fn create_vehicle(
        &self,
        credential: &Credential,
        fields: &VehicleFields,
    ) -> RepositoryResult<Vehicle> {
        Self::check(credential)?;
        Ok(self.insert(fields.clone()))
    }

    async fn update_vehicle(
        &self,
        credential: &Credential,
        id: VehicleId,
        fields: &VehicleFields,
    ) -> RepositoryResult<Vehicle> {
        Self::check(credential)?;
        let mut server = self.server.lock().unwrap();
        let slot = server
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = fields.clone().into_vehicle(id, slot.created_at);
        Ok(slot.clone())
    }

    async fn delete_vehicle(&self, credential: &Credential, id: VehicleId) -> RepositoryResult<()> {
        Self::check(credential)?;
        let mut server = self.server.lock().unwrap();
        let before = server.vehicles.len();
        server.vehicles.retain(|v| v.id != id);
        if server.vehicles.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
