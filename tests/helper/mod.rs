//! Shared fixtures for integration tests

#![allow(dead_code, unused_imports)]

pub mod registry;
pub mod settings;

pub use registry::{StaticRegistry, registries};
pub use settings::{curseforge_provider, github_provider, installed_mod, write_settings};
