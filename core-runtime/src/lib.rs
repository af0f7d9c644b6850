//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media tracker core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the catalog crates depend on.
//! It establishes the logging conventions, the validated configuration
//! object, and the event broadcasting mechanism used to notify the view
//! layer about query and catalog changes.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
