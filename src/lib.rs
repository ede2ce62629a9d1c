//! Record synchronization and aggregation layer of the fleet console.
//!
//! The `data` feature exposes the domain records, form validation,
//! projections and read models. The default `client` feature adds the HTTP
//! repository and the list controller that keeps a paginated, searchable view
//! of the remote vehicle collection consistent across edits.

#[cfg(feature = "data")]
pub mod aggregates;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod pagination;

#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;
