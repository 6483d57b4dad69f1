//! Sweet catalog route handlers.
//!
//! Handlers authenticate through the [`OptionalAuth`] extractor, query the
//! authorization gate once, then delegate to the query side (store) or the
//! inventory mutator. All responses use the uniform envelope.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use rust_decimal::Decimal;
use serde::Deserialize;

use sweet_shop_core::{Category, SweetId};

use crate::auth::gate::{self, Operation};
use crate::catalog::SweetFilter;
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::inventory;
use crate::middleware::OptionalAuth;
use crate::models::Sweet;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::{CreateSweetRequest, UpdateSweetRequest};

/// Search query parameters, raw off the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Stock mutation body for purchase and restock.
#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: Option<i64>,
}

/// Parse a path id; an unparseable id is indistinguishable from an
/// unknown one as far as the caller is concerned.
fn parse_id(raw: &str) -> Result<SweetId> {
    raw.parse().map_err(|_| AppError::NotFound)
}

fn parse_price(field: &str, raw: &str) -> Result<Decimal> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a number")))
}

/// `GET /api/sweets` - list the whole catalog, newest first.
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Sweet>>> {
    let sweets = state.catalog().list_all().await?;
    Ok(ApiResponse::list(sweets))
}

/// `GET /api/sweets/search` - filtered search.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<Sweet>>> {
    let mut filter = SweetFilter::default();

    if let Some(name) = query.name.filter(|s| !s.is_empty()) {
        filter.name = Some(name);
    }

    if let Some(raw) = query.category.filter(|s| !s.is_empty()) {
        match raw.parse::<Category>() {
            Ok(category) => filter.category = Some(category),
            // An unknown category matches nothing, same as the exact-match
            // semantics against a catalog that never stores it.
            Err(_) => return Ok(ApiResponse::list(Vec::new())),
        }
    }

    if let Some(raw) = query.min_price.filter(|s| !s.is_empty()) {
        filter.min_price = Some(parse_price("minPrice", &raw)?);
    }

    if let Some(raw) = query.max_price.filter(|s| !s.is_empty()) {
        filter.max_price = Some(parse_price("maxPrice", &raw)?);
    }

    let sweets = state.catalog().search(&filter).await?;
    Ok(ApiResponse::list(sweets))
}

/// `GET /api/sweets/{id}` - single sweet.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Sweet>> {
    let id = parse_id(&id)?;
    let sweet = state.catalog().get(id).await?.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok(sweet))
}

/// `POST /api/sweets` - create (admin).
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    ApiJson(req): ApiJson<CreateSweetRequest>,
) -> Result<Response> {
    gate::authorize(identity.as_ref(), Operation::Create)?;
    let sweet = inventory::create(state.catalog(), req).await?;
    Ok(ApiResponse::ok_with_message("Sweet created successfully", sweet)
        .with_status(StatusCode::CREATED))
}

/// `PUT /api/sweets/{id}` - partial update of mutable fields (admin).
pub async fn update(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateSweetRequest>,
) -> Result<ApiResponse<Sweet>> {
    gate::authorize(identity.as_ref(), Operation::Update)?;
    let id = parse_id(&id)?;
    let sweet = inventory::update(state.catalog(), id, req).await?;
    Ok(ApiResponse::ok_with_message("Sweet updated successfully", sweet))
}

/// `DELETE /api/sweets/{id}` - hard delete (admin).
pub async fn delete_one(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    gate::authorize(identity.as_ref(), Operation::Delete)?;
    let id = parse_id(&id)?;
    inventory::delete(state.catalog(), id).await?;
    Ok(ApiResponse::ok_with_message(
        "Sweet deleted successfully",
        serde_json::json!({}),
    ))
}

/// `POST /api/sweets/{id}/purchase` - decrement stock (authenticated).
pub async fn purchase(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<QuantityRequest>,
) -> Result<ApiResponse<Sweet>> {
    gate::authorize(identity.as_ref(), Operation::Purchase)?;
    let id = parse_id(&id)?;
    let sweet = inventory::purchase(state.catalog(), id, req.quantity).await?;
    Ok(ApiResponse::ok_with_message("Purchase successful", sweet))
}

/// `POST /api/sweets/{id}/restock` - increment stock (admin).
pub async fn restock(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<QuantityRequest>,
) -> Result<ApiResponse<Sweet>> {
    gate::authorize(identity.as_ref(), Operation::Restock)?;
    let id = parse_id(&id)?;
    let sweet = inventory::restock(state.catalog(), id, req.quantity).await?;
    Ok(ApiResponse::ok_with_message("Restock successful", sweet))
}
