use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BrandName, ChassisNumber, EngineNumber, ModelNumber, RegistrationNumber, Transmission,
    Variant, VehicleId, VehicleName, VehicleStatus, VehicleType,
};

/// Vehicle record as served by the remote collection.
///
/// Category values are kept exactly as received so that projections can
/// report values this client does not know about; use the typed accessors to
/// interpret them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub vehicle_name: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub vehicle_subtype: Option<String>,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub chassis_number: String,
    #[serde(default)]
    pub engine_number: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Vehicle {
    pub fn vehicle_type(&self) -> Option<VehicleType> {
        self.vehicle_type.parse().ok()
    }

    pub fn variant(&self) -> Option<Variant> {
        self.variant.parse().ok()
    }

    pub fn transmission(&self) -> Option<Transmission> {
        self.transmission.parse().ok()
    }

    /// Normalized status; unknown or missing values count as active.
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::normalize(self.status.as_deref())
    }

    /// Calendar date of creation in the offset the server reported.
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.date_naive())
    }
}

/// Full set of operator-editable fields, used for both create and update.
///
/// Updates replace the whole record; identity and timestamps stay with the
/// server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VehicleFields {
    pub brand_name: BrandName,
    pub vehicle_name: VehicleName,
    pub model_number: ModelNumber,
    pub registration_number: RegistrationNumber,
    pub vehicle_type: VehicleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_subtype: Option<String>,
    pub variant: Variant,
    pub transmission: Transmission,
    pub chassis_number: ChassisNumber,
    pub engine_number: EngineNumber,
    pub description: Option<String>,
    #[serde(default)]
    pub status: VehicleStatus,
}

impl VehicleFields {
    /// Builds the record the server is expected to return for these fields.
    #[must_use]
    pub fn into_vehicle(
        self,
        id: VehicleId,
        created_at: Option<DateTime<FixedOffset>>,
    ) -> Vehicle {
        Vehicle {
            id,
            brand_name: self.brand_name.into_inner(),
            vehicle_name: self.vehicle_name.into_inner(),
            model_number: self.model_number.into_inner(),
            registration_number: self.registration_number.into_inner(),
            vehicle_type: self.vehicle_type.as_str().to_string(),
            vehicle_subtype: self.vehicle_subtype,
            variant: self.variant.as_str().to_string(),
            transmission: self.transmission.as_str().to_string(),
            chassis_number: self.chassis_number.into_inner(),
            engine_number: self.engine_number.into_inner(),
            description: self.description,
            status: Some(self.status.as_str().to_string()),
            created_at,
            updated_at: created_at,
        }
    }
}

/// One page of the remote collection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VehiclePage {
    pub results: Vec<Vehicle>,
    /// Total number of records matching the query across all pages.
    pub count: usize,
    pub page_size: usize,
}

impl VehiclePage {
    /// Number of pages the server will serve for this query.
    pub fn page_count(&self) -> usize {
        crate::pagination::page_count(self.count, self.page_size)
    }
}
