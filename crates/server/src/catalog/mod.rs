//! Catalog storage.
//!
//! The [`CatalogStore`] trait is the seam between the API and persistence.
//! Two implementations ship:
//!
//! - [`memory::MemoryCatalog`] - per-item locking, for single-process
//!   deployments and tests
//! - [`postgres::PgCatalog`] - conditional updates pushed into SQL, for
//!   deployments where multiple nodes share one database
//!
//! Both guarantee the same invariant: the check-then-write on a single
//! item's quantity is indivisible, so concurrent purchases can never drive
//! stock negative.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use sweet_shop_core::{Category, SweetId};

use crate::models::{NewSweet, Sweet, SweetPatch};

/// Errors surfaced by catalog store implementations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No sweet with the given id.
    #[error("sweet not found")]
    NotFound,

    /// Purchase amount exceeds the stock on hand.
    #[error("only {available} items available in stock")]
    InsufficientStock { available: i64 },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data violates an invariant (or a lock was poisoned).
    #[error("data corruption: {0}")]
    Corrupt(String),
}

/// Search filter; unset options are unconstrained and options combine
/// with logical AND. An empty filter is equivalent to `list_all`.
#[derive(Debug, Clone, Default)]
pub struct SweetFilter {
    /// Case-insensitive substring match against the name.
    pub name: Option<String>,
    /// Exact category match.
    pub category: Option<Category>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

impl SweetFilter {
    /// Whether a sweet satisfies every set option.
    ///
    /// An inverted range (min > max) matches nothing; that mirrors the
    /// behavior of issuing both bounds to the database.
    #[must_use]
    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(name) = &self.name
            && !sweet.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }
        if let Some(category) = self.category
            && sweet.category != category
        {
            return false;
        }
        if let Some(min) = self.min_price
            && sweet.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && sweet.price > max
        {
            return false;
        }
        true
    }
}

/// Durable key-value mapping from sweet id to sweet record.
///
/// All operations are keyed by id. Ordering of `list_all` and `search`
/// results is creation time descending (id as tiebreak) for determinism.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a single sweet.
    async fn get(&self, id: SweetId) -> Result<Option<Sweet>, CatalogError>;

    /// All sweets, newest first.
    async fn list_all(&self) -> Result<Vec<Sweet>, CatalogError>;

    /// Sweets matching the filter, newest first.
    async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>, CatalogError>;

    /// Store a new sweet; the store assigns id and timestamps.
    async fn insert(&self, new: NewSweet) -> Result<Sweet, CatalogError>;

    /// Apply a validated patch wholesale and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    async fn update(&self, id: SweetId, patch: SweetPatch) -> Result<Sweet, CatalogError>;

    /// Hard-delete a sweet.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    async fn delete(&self, id: SweetId) -> Result<(), CatalogError>;

    /// Atomically decrement quantity by `amount` if enough stock exists.
    ///
    /// The caller has already checked `amount >= 1`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown, `InsufficientStock` (carrying the
    /// quantity actually available) if stock would go negative.
    async fn purchase(&self, id: SweetId, amount: i64) -> Result<Sweet, CatalogError>;

    /// Atomically increment quantity by `amount`; no upper bound.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    async fn restock(&self, id: SweetId, amount: i64) -> Result<Sweet, CatalogError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), CatalogError>;
}
