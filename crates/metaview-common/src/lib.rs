//! MetaView Common - Shared types and utilities
//!
//! This crate provides the metadata record types, error definitions, and
//! configuration structures used across all MetaView components.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CacheConfig, ViewConfig};
pub use error::{Error, Result};
pub use types::*;
