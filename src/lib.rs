//! Workflow engine for a spa booking marketplace.
//!
//! Spa owners list spas and services that an admin admits, customers book
//! services at a price locked in at booking time, owners confirm or decline,
//! and customers review spas they have visited.

pub mod availability;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod pricing;
pub mod seed;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;
pub mod view;

pub use config::EngineConfig;
pub use context::Actor;
pub use error::{EngineError, Result};
pub use service::Marketplace;
