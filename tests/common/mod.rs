use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use rosy_jewel_api::auth::TokenService;
use rosy_jewel_api::models::admin::Admin;
use rosy_jewel_api::routes;
use rosy_jewel_api::state::AppState;
use rosy_jewel_api::store::AdminStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@startup.com";
pub const ADMIN_PASSWORD: &str = "shiny-rings-123";

/// A full application over the in-process store. Each test gets its own
/// isolated instance; requests are driven through the router directly,
/// no socket involved.
pub struct TestApp {
    pub router: axum::Router,
    pub state: AppState,
}

pub fn spawn_app() -> TestApp {
    let state = AppState::in_memory(TokenService::new(TEST_SECRET, 7));
    let router = routes::router(state.clone());
    TestApp { router, state }
}

impl TestApp {
    /// Insert the administrative account directly into the store and
    /// return it. Uses a low bcrypt cost to keep the suites fast.
    pub async fn seed_admin(&self) -> Admin {
        let now = chrono::Utc::now();
        let admin = Admin {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: bcrypt::hash(ADMIN_PASSWORD, 4).expect("bcrypt hash"),
            created_at: now,
            updated_at: now,
        };
        self.state.admins.insert(&admin).await.expect("insert admin");
        admin
    }

    /// Seed the admin and mint a valid bearer token for it.
    pub async fn admin_token(&self) -> String {
        let admin = self.seed_admin().await;
        self.state.tokens.issue(&admin.principal()).expect("issue token")
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    /// GET with a raw Authorization header value, for exercising
    /// malformed credential schemes.
    pub async fn get_with_auth_header(
        &self,
        path: &str,
        auth_value: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::AUTHORIZATION, auth_value)
            .body(Body::empty())
            .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::PATCH, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }
}
