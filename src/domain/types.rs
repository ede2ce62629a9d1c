//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! trimmed non-empty identification numbers, known category values) so that
//! once a value reaches the domain layer it can be treated as trusted.
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value is not one of the accepted choices.
    #[error("invalid {field}: {value}")]
    UnknownChoice { field: &'static str, value: String },
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(VehicleId, "Server-assigned identifier of a vehicle record.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(BrandName, "Manufacturer brand, e.g. Toyota.");
non_empty_string_newtype!(VehicleName, "Model name of the vehicle, e.g. Corolla.");
non_empty_string_newtype!(ModelNumber, "Model or series number.");
non_empty_string_newtype!(
    RegistrationNumber,
    "Registration plate, unique across the fleet."
);
non_empty_string_newtype!(ChassisNumber, "Chassis number, unique across the fleet.");
non_empty_string_newtype!(EngineNumber, "Engine number, unique across the fleet.");

/// Macro to generate closed category enums stored as lowercase wire strings.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// All accepted values in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value as sent to and received from the remote service.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Human readable label.
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(TypeConstraintError::UnknownChoice {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

choice_enum!(
    /// Body category of a vehicle.
    VehicleType, "vehicle_type" {
        Car => ("car", "Car"),
        Bike => ("bike", "Bike"),
        Truck => ("truck", "Truck"),
        Bus => ("bus", "Bus"),
        Van => ("van", "Van"),
        Other => ("other", "Other"),
    }
);

choice_enum!(
    /// Trim level of a vehicle.
    Variant, "variant" {
        Base => ("base", "Base"),
        Standard => ("standard", "Standard"),
        Deluxe => ("deluxe", "Deluxe"),
        Sport => ("sport", "Sport"),
        Luxury => ("luxury", "Luxury"),
        Limited => ("limited", "Limited Edition"),
        Premium => ("premium", "Premium"),
        Custom => ("custom", "Custom"),
    }
);

choice_enum!(
    /// Gearbox kind.
    Transmission, "transmission" {
        Manual => ("manual", "Manual"),
        Automatic => ("automatic", "Automatic"),
        SemiAutomatic => ("semi_automatic", "Semi-Automatic"),
    }
);

choice_enum!(
    /// Lifecycle status of a vehicle in the fleet.
    #[derive(Default)]
    VehicleStatus, "status" {
        #[default]
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        Pending => ("pending", "Pending"),
    }
);

impl VehicleStatus {
    /// Maps a raw status as received from the server onto a status bucket.
    ///
    /// Only `inactive` and `pending` are recognized; anything else, including
    /// a missing value, is treated as active.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("inactive") => VehicleStatus::Inactive,
            Some("pending") => VehicleStatus::Pending,
            _ => VehicleStatus::Active,
        }
    }
}
