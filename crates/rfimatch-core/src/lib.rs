//! rfimatch Core - Domain models, configuration, and capability ports
//!
//! This crate contains the domain types shared by every stage of the
//! observation/RFI correlation pipeline, plus the port traits that the
//! archive, satellite and credential adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod time;

pub use error::{Result, RfiMatchError};
