//! Integration tests for the sweet shop API.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`,
//! backed by the in-memory catalog and a static token table. No network,
//! no database, no server process.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweet-shop-integration-tests
//! ```
//!
//! # Token Table
//!
//! - `admin-token` - alice, admin role
//! - `user-token` - bob, user role

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use sweet_shop_core::Role;
use sweet_shop_server::auth::StaticTokenAuthenticator;
use sweet_shop_server::catalog::memory::MemoryCatalog;
use sweet_shop_server::config::ServerConfig;
use sweet_shop_server::routes;
use sweet_shop_server::state::AppState;

/// Bearer token resolving to the admin role.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token resolving to the user role.
pub const USER_TOKEN: &str = "user-token";

/// An in-process application instance over an empty in-memory catalog.
///
/// The router is `Clone`; every clone shares the same catalog, so
/// concurrent requests through cloned routers contend on real state.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build an app with an empty catalog and the fixed token table.
    #[must_use]
    pub fn new() -> Self {
        let config = ServerConfig {
            host: std::net::Ipv4Addr::LOCALHOST.into(),
            port: 0,
            database_url: None,
            admin_tokens: Vec::new(),
            user_tokens: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let authenticator = StaticTokenAuthenticator::new([
            ("alice".to_owned(), ADMIN_TOKEN.to_owned(), Role::Admin),
            ("bob".to_owned(), USER_TOKEN.to_owned(), Role::User),
        ]);

        let state = AppState::new(
            config,
            Arc::new(MemoryCatalog::new()),
            Arc::new(authenticator),
        );

        Self {
            router: routes::router().with_state(state),
        }
    }

    /// Send one request and return the status plus the decoded body.
    ///
    /// Non-JSON bodies (the health endpoints) come back as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the service fails, which
    /// only happens on malformed test input.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Service call failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }

    /// `GET` without a body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    /// `POST` with an optional token and JSON body.
    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// `PUT` with an optional token and JSON body.
    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    /// `DELETE` with an optional token.
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Seed one sweet through the API as admin; returns its envelope `data`.
    ///
    /// # Panics
    ///
    /// Panics if creation does not succeed.
    pub async fn create_sweet(
        &self,
        name: &str,
        category: &str,
        price: f64,
        quantity: i64,
    ) -> Value {
        let body = serde_json::json!({
            "name": name,
            "description": format!("{name} description"),
            "category": category,
            "price": price,
            "quantity": quantity,
        });

        let (status, envelope) = self.post("/api/sweets", Some(ADMIN_TOKEN), body).await;
        assert_eq!(status, StatusCode::CREATED, "seed failed: {envelope}");

        envelope
            .get("data")
            .cloned()
            .expect("create response missing data")
    }
}

/// Extract the string id from a sweet's JSON representation.
///
/// # Panics
///
/// Panics if the value has no string `id` field.
#[must_use]
pub fn sweet_id(sweet: &Value) -> String {
    sweet
        .get("id")
        .and_then(Value::as_str)
        .expect("sweet has no id")
        .to_owned()
}
