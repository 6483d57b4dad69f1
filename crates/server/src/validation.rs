//! Field-level validation for catalog writes.
//!
//! The same rules run on the create and update paths; updates validate
//! only the fields present but apply the identical constraints. Failures
//! come back as a structured list of field errors rather than a single
//! message, so clients can attach them to form fields.

use rust_decimal::Decimal;
use serde::Deserialize;

use sweet_shop_core::Category;

use crate::models::{NewSweet, SweetPatch};

/// A single validation failure tied to an input field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_owned(),
        }
    }
}

/// Unvalidated create payload as it arrives on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSweetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
}

/// Unvalidated update payload; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSweetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
}

/// Validate a create payload into a [`NewSweet`].
///
/// # Errors
///
/// Returns every failed field in one pass so the caller sees the full
/// picture, not just the first problem.
pub fn validate_create(req: CreateSweetRequest) -> Result<NewSweet, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = match req.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_owned()),
        _ => {
            errors.push(FieldError::new("name", "Sweet name is required"));
            None
        }
    };

    let description = match req.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => Some(description.to_owned()),
        _ => {
            errors.push(FieldError::new("description", "Description is required"));
            None
        }
    };

    let category = match req.category.as_deref().map(str::parse::<Category>) {
        Some(Ok(category)) => Some(category),
        _ => {
            errors.push(FieldError::new("category", "Invalid category"));
            None
        }
    };

    let price = match req.price {
        Some(price) if price >= Decimal::ZERO => Some(price),
        _ => {
            errors.push(FieldError::new("price", "Price must be a positive number"));
            None
        }
    };

    let quantity = match req.quantity {
        Some(quantity) if quantity >= 0 => Some(quantity),
        _ => {
            errors.push(FieldError::new(
                "quantity",
                "Quantity must be a non-negative integer",
            ));
            None
        }
    };

    match (name, description, category, price, quantity) {
        (Some(name), Some(description), Some(category), Some(price), Some(quantity))
            if errors.is_empty() =>
        {
            Ok(NewSweet {
                name,
                description,
                category,
                price,
                quantity,
                image_url: req.image_url,
            })
        }
        _ => Err(errors),
    }
}

/// Validate an update payload into a [`SweetPatch`].
///
/// Fields absent from the payload are left untouched; fields present are
/// held to the same rules as on creation.
///
/// # Errors
///
/// Returns the full list of failed fields; a failing patch is rejected
/// wholesale and nothing is applied.
pub fn validate_update(req: UpdateSweetRequest) -> Result<SweetPatch, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut patch = SweetPatch::default();

    if let Some(name) = req.name {
        let name = name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Sweet name is required"));
        } else {
            patch.name = Some(name.to_owned());
        }
    }

    if let Some(description) = req.description {
        let description = description.trim();
        if description.is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        } else {
            patch.description = Some(description.to_owned());
        }
    }

    if let Some(category) = req.category {
        match category.parse::<Category>() {
            Ok(category) => patch.category = Some(category),
            Err(_) => errors.push(FieldError::new("category", "Invalid category")),
        }
    }

    if let Some(price) = req.price {
        if price >= Decimal::ZERO {
            patch.price = Some(price);
        } else {
            errors.push(FieldError::new("price", "Price must be a positive number"));
        }
    }

    if let Some(quantity) = req.quantity {
        if quantity >= 0 {
            patch.quantity = Some(quantity);
        } else {
            errors.push(FieldError::new(
                "quantity",
                "Quantity must be a non-negative integer",
            ));
        }
    }

    if let Some(image_url) = req.image_url {
        patch.image_url = Some(image_url);
    }

    if errors.is_empty() { Ok(patch) } else { Err(errors) }
}
