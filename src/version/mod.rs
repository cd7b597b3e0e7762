//! Version resolution layer for installed mods
//!
//! Fetches release listings from remote providers, extracts semantic
//! versions from candidate names and decides whether a newer build exists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│    Cache    │     │  Resolvers  │
//! │  (fetch)    │     │  (storage)  │     │ (per kind)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │ Registries  │                         │  Extract /  │
//! │(gh,cf,masa) │                         │filter / max │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-based listing cache with a fixed lifetime
//! - [`error`]: Error types for cache, registry and resolution operations
//! - [`extract`]: Regex-driven version extraction from candidate fields
//! - [`filter`]: Game version filtering with an optional fallback tier
//! - [`provider`]: Provider configuration, one variant per kind
//! - [`registry`]: Registry trait for fetching listings from remote sources
//! - [`registries`]: Concrete registry implementations and the caching decorator
//! - [`resolver`]: Maximum-version selection
//! - [`resolvers`]: Per-provider resolution pipelines
//! - [`semver`]: Semantic version parsing and precedence
//! - [`types`]: Candidates, listings and decisions

pub mod cache;
pub mod error;
pub mod extract;
pub mod filter;
pub mod provider;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod resolvers;
pub mod semver;
pub mod types;
