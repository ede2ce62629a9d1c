use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{
    BrandName, ChassisNumber, EngineNumber, ModelNumber, RegistrationNumber, VehicleName,
    VehicleStatus,
};
use crate::domain::vehicle::{Vehicle, VehicleFields};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Raw operator input for adding or editing a vehicle.
pub struct VehicleForm {
    #[validate(length(min = 1, max = 100))]
    pub brand_name: String,
    #[validate(length(min = 1, max = 100))]
    pub vehicle_name: String,
    #[validate(length(min = 1, max = 50))]
    pub model_number: String,
    #[validate(length(min = 1, max = 50))]
    pub registration_number: String,
    pub vehicle_type: String,
    #[validate(length(max = 50))]
    pub vehicle_subtype: Option<String>,
    pub variant: String,
    pub transmission: String,
    #[validate(length(min = 1, max = 100))]
    pub chassis_number: String,
    #[validate(length(min = 1, max = 100))]
    pub engine_number: String,
    pub description: Option<String>,
    /// Empty means active.
    #[serde(default)]
    pub status: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl TryFrom<VehicleForm> for VehicleFields {
    type Error = FormError;

    /// Validate the form and convert it into typed fields for the repository.
    fn try_from(form: VehicleForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = if form.status.trim().is_empty() {
            VehicleStatus::default()
        } else {
            form.status.parse()?
        };

        Ok(VehicleFields {
            brand_name: BrandName::new(form.brand_name)?,
            vehicle_name: VehicleName::new(form.vehicle_name)?,
            model_number: ModelNumber::new(form.model_number)?,
            registration_number: RegistrationNumber::new(form.registration_number)?,
            vehicle_type: form.vehicle_type.parse()?,
            vehicle_subtype: non_blank(form.vehicle_subtype),
            variant: form.variant.parse()?,
            transmission: form.transmission.parse()?,
            chassis_number: ChassisNumber::new(form.chassis_number)?,
            engine_number: EngineNumber::new(form.engine_number)?,
            description: non_blank(form.description),
            status,
        })
    }
}

impl From<&Vehicle> for VehicleForm {
    /// Prefill the editor with an existing record.
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            brand_name: vehicle.brand_name.clone(),
            vehicle_name: vehicle.vehicle_name.clone(),
            model_number: vehicle.model_number.clone(),
            registration_number: vehicle.registration_number.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            vehicle_subtype: vehicle.vehicle_subtype.clone(),
            variant: vehicle.variant.clone(),
            transmission: vehicle.transmission.clone(),
            chassis_number: vehicle.chassis_number.clone(),
            engine_number: vehicle.engine_number.clone(),
            description: vehicle.description.clone(),
            status: vehicle.status().as_str().to_string(),
        }
    }
}
