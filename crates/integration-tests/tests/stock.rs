//! Stock mutation tests: purchase, restock, and oversell protection.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use tokio::task::JoinSet;
use uuid::Uuid;

use sweet_shop_integration_tests::{ADMIN_TOKEN, TestApp, USER_TOKEN, sweet_id};

// ============================================================================
// Purchase
// ============================================================================

#[tokio::test]
async fn test_purchase_decrements_stock() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Rasmalai", "traditional", 140.0, 30).await;
    let id = sweet_id(&sweet);

    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 4 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Purchase successful");
    assert_eq!(body["data"]["quantity"], 26);
}

#[tokio::test]
async fn test_purchase_more_than_stock_reports_available() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Soan Papdi", "traditional", 55.0, 7).await;
    let id = sweet_id(&sweet);

    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 8 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Only 7 items available in stock");

    // Stock untouched by the failed purchase
    let (_, body) = app.get(&format!("/api/sweets/{id}")).await;
    assert_eq!(body["data"]["quantity"], 7);
}

#[tokio::test]
async fn test_purchase_exact_stock_empties_it() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Mysore Pak", "traditional", 110.0, 5).await;
    let id = sweet_id(&sweet);

    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 5 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 0);

    // Next purchase fails with zero available
    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only 0 items available in stock");
}

#[tokio::test]
async fn test_purchase_invalid_amounts_are_400() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Petha", "traditional", 45.0, 10).await;
    let id = sweet_id(&sweet);
    let uri = format!("/api/sweets/{id}/purchase");

    for body in [json!({ "quantity": 0 }), json!({ "quantity": -3 }), json!({})] {
        let (status, response) = app.post(&uri, Some(USER_TOKEN), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Please provide a valid quantity");
    }

    // Invalid amount never touches stock
    let (_, body) = app.get(&format!("/api/sweets/{id}")).await;
    assert_eq!(body["data"]["quantity"], 10);
}

#[tokio::test]
async fn test_purchase_unknown_sweet_is_404() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            &format!("/api/sweets/{}/purchase", Uuid::new_v4()),
            Some(USER_TOKEN),
            json!({ "quantity": 1 }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Sweet not found");
}

// ============================================================================
// Restock
// ============================================================================

#[tokio::test]
async fn test_restock_increments_stock() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Besan Ladoo", "traditional", 65.0, 3).await;
    let id = sweet_id(&sweet);

    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/restock"),
            Some(ADMIN_TOKEN),
            json!({ "quantity": 17 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Restock successful");
    assert_eq!(body["data"]["quantity"], 20);
}

#[tokio::test]
async fn test_restock_invalid_amount_is_400() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Coconut Barfi", "traditional", 75.0, 10).await;
    let id = sweet_id(&sweet);

    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/restock"),
            Some(ADMIN_TOKEN),
            json!({ "quantity": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a valid quantity");
}

#[tokio::test]
async fn test_restock_unknown_sweet_is_404() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            &format!("/api/sweets/{}/restock", Uuid::new_v4()),
            Some(ADMIN_TOKEN),
            json!({ "quantity": 5 }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_purchase_then_restock_lifecycle() {
    let app = TestApp::new();
    let sweet = app
        .create_sweet("Gulab Jamun", "traditional", 150.0, 100)
        .await;
    let id = sweet_id(&sweet);

    // Buy 5 of 100
    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 95);

    // A purchase of 150 exceeds the remaining 95 and changes nothing
    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 150 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only 95 items available in stock");

    let (_, body) = app.get(&format!("/api/sweets/{id}")).await;
    assert_eq!(body["data"]["quantity"], 95);

    // Restock 50
    let (status, body) = app
        .post(
            &format!("/api/sweets/{id}/restock"),
            Some(ADMIN_TOKEN),
            json!({ "quantity": 50 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 145);
}

#[tokio::test]
async fn test_concurrent_purchases_never_oversell() {
    let app = TestApp::new();
    let sweet = app.create_sweet("Jalebi", "traditional", 30.0, 10).await;
    let id = sweet_id(&sweet);

    // 10 buyers each want 3 of 10 items; at most 3 can succeed.
    let mut tasks = JoinSet::new();
    for _ in 0..10 {
        let app = app.clone();
        let uri = format!("/api/sweets/{id}/purchase");
        tasks.spawn(async move {
            let (status, _) = app
                .post(&uri, Some(USER_TOKEN), json!({ "quantity": 3 }))
                .await;
            status
        });
    }

    let mut successes = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap() == StatusCode::OK {
            successes += 1;
        }
    }
    assert_eq!(successes, 3);

    let (_, body) = app.get(&format!("/api/sweets/{id}")).await;
    assert_eq!(body["data"]["quantity"], 1);
}

#[tokio::test]
async fn test_items_deplete_independently() {
    let app = TestApp::new();
    let a = app.create_sweet("Item A", "candies", 10.0, 2).await;
    let b = app.create_sweet("Item B", "candies", 10.0, 50).await;
    let a_id = sweet_id(&a);
    let b_id = sweet_id(&b);

    // Exhaust A
    let (status, _) = app
        .post(
            &format!("/api/sweets/{a_id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // B is unaffected
    let (status, body) = app
        .post(
            &format!("/api/sweets/{b_id}/purchase"),
            Some(USER_TOKEN),
            json!({ "quantity": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 40);
}
