//! Runtime settings for the console.

pub mod config;
