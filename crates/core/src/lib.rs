//! Sweet Shop Core - Shared types library.
//!
//! This crate provides common types used across all Sweet Shop components:
//! - `server` - The inventory-backed storefront API
//! - `integration-tests` - End-to-end tests against the full router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, categories, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
