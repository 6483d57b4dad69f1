//! Sweet Shop server library.
//!
//! This crate provides the storefront API as a library, allowing the full
//! router to be exercised in-process by the integration test crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod inventory;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
pub mod validation;
