//! Domain models for the catalog.

pub mod sweet;

pub use sweet::{DEFAULT_IMAGE_URL, NewSweet, Sweet, SweetPatch};
