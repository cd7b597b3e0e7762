//! Applying resolved updates to a Minecraft installation
//!
//! - [`settings`]: the persisted settings file
//! - [`download`]: streaming downloads into the staging directory
//! - [`apply`]: disabling old files and installing staged ones
//! - [`service`]: the update run tying fetch, resolve and apply together

pub mod apply;
pub mod download;
pub mod error;
pub mod service;
pub mod settings;

pub use service::{UpdateSummary, UpdaterService, run};
pub use settings::Settings;
