//! Core types for Sweet Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod role;

pub use category::Category;
pub use id::*;
pub use role::Role;
