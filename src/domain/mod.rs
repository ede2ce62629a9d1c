//! Domain records exchanged with the remote vehicle collection.

pub mod auth;
pub mod types;
pub mod vehicle;
