//! The catalog entity and its write-side inputs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use sweet_shop_core::{Category, SweetId};

/// Image URL applied when the caller does not supply one.
pub const DEFAULT_IMAGE_URL: &str = "https://via.placeholder.com/300x200?text=Sweet";

/// A catalog entry representing a sellable product with price and stock.
///
/// `quantity` is the sole mutable stock field and never goes negative;
/// the store enforces this across concurrent purchases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    pub id: SweetId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: Decimal,
    pub quantity: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sweet {
    /// Materialize a new catalog entry: id and timestamps are assigned
    /// atomically with the rest of the fields.
    #[must_use]
    pub fn from_new(new: NewSweet) -> Self {
        let now = Utc::now();
        Self {
            id: SweetId::new(),
            name: new.name,
            description: new.description,
            category: new.category,
            price: new.price,
            quantity: new.quantity,
            image_url: new.image_url.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_owned()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated partial update and refresh `updated_at`.
    pub fn apply(&mut self, patch: SweetPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        self.updated_at = Utc::now();
    }
}

/// Validated input for creating a sweet.
///
/// Produced only by [`crate::validation::validate_create`]; invariants
/// (non-empty strings, non-negative price and quantity) already hold.
#[derive(Debug, Clone)]
pub struct NewSweet {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: Decimal,
    pub quantity: i64,
    pub image_url: Option<String>,
}

/// Validated partial update of mutable fields.
///
/// Produced only by [`crate::validation::validate_update`]. Applied
/// wholesale: a patch that would violate an invariant is rejected before
/// it reaches the store.
#[derive(Debug, Clone, Default)]
pub struct SweetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
}
