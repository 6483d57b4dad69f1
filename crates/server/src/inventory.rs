//! The inventory mutator.
//!
//! Every catalog state change flows through here: creation and updates get
//! field-level validation, purchase and restock get amount validation, and
//! the store is left to enforce atomicity of the quantity change itself.

use sweet_shop_core::SweetId;

use crate::catalog::CatalogStore;
use crate::error::{AppError, Result};
use crate::models::Sweet;
use crate::validation::{self, CreateSweetRequest, UpdateSweetRequest};

/// Create a catalog entry.
///
/// # Errors
///
/// `Validation` with field errors if the payload is malformed.
pub async fn create(store: &dyn CatalogStore, req: CreateSweetRequest) -> Result<Sweet> {
    let new = validation::validate_create(req).map_err(AppError::Validation)?;
    let sweet = store.insert(new).await?;
    tracing::info!(id = %sweet.id, name = %sweet.name, "sweet created");
    Ok(sweet)
}

/// Apply a partial update to the mutable fields.
///
/// # Errors
///
/// `Validation` if any present field fails the create-path rules (the
/// patch is rejected wholesale); `NotFound` for an unknown id.
pub async fn update(store: &dyn CatalogStore, id: SweetId, req: UpdateSweetRequest) -> Result<Sweet> {
    let patch = validation::validate_update(req).map_err(AppError::Validation)?;
    let sweet = store.update(id, patch).await?;
    tracing::info!(id = %sweet.id, "sweet updated");
    Ok(sweet)
}

/// Hard-delete a catalog entry.
///
/// # Errors
///
/// `NotFound` for an unknown id.
pub async fn delete(store: &dyn CatalogStore, id: SweetId) -> Result<()> {
    store.delete(id).await?;
    tracing::info!(%id, "sweet deleted");
    Ok(())
}

/// Decrement stock by a caller-chosen amount.
///
/// # Errors
///
/// `InvalidAmount` if the amount is missing or below 1; `NotFound` for an
/// unknown id; `InsufficientStock` (with the available quantity) if the
/// purchase exceeds stock. A failed purchase leaves quantity unchanged.
pub async fn purchase(
    store: &dyn CatalogStore,
    id: SweetId,
    amount: Option<i64>,
) -> Result<Sweet> {
    let amount = amount.filter(|&a| a >= 1).ok_or(AppError::InvalidAmount)?;
    let sweet = store.purchase(id, amount).await?;
    tracing::info!(%id, amount, remaining = sweet.quantity, "purchase");
    Ok(sweet)
}

/// Increment stock by a caller-chosen amount; no upper bound.
///
/// # Errors
///
/// `InvalidAmount` if the amount is missing or below 1; `NotFound` for an
/// unknown id.
pub async fn restock(store: &dyn CatalogStore, id: SweetId, amount: Option<i64>) -> Result<Sweet> {
    let amount = amount.filter(|&a| a >= 1).ok_or(AppError::InvalidAmount)?;
    let sweet = store.restock(id, amount).await?;
    tracing::info!(%id, amount, total = sweet.quantity, "restock");
    Ok(sweet)
}
