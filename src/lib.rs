//! Workspace façade crate.
//!
//! Exposes shared feature flags that map to the individual workspace crates
//! (`core-service`, `core-catalog`, `core-runtime`). Host applications can
//! depend on `mediatrack-workspace` and enable the documented features
//! without wiring each crate individually.

#[cfg(feature = "service")]
pub use core_service::{core_catalog as catalog, core_runtime as runtime};
#[cfg(feature = "service")]
pub use core_service::{CatalogService, CoreError, Result};
