//! Shared harness for API integration tests.
//!
//! Every app runs against the in-memory entity and object stores, so these
//! tests need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use touchgrass_api::auth::jwt::{generate_token, JwtConfig};
use touchgrass_api::config::ServerConfig;
use touchgrass_api::router::build_app_router;
use touchgrass_api::state::AppState;
use touchgrass_core::roles::ROLE_ORGANIZER;
use touchgrass_core::staging::StagingPolicy;
use touchgrass_core::types::EntityId;
use touchgrass_storage::{InMemoryObjectStore, MediaRepository, ObjectStore};
use touchgrass_workflow::MemoryEntityStore;
use uuid::Uuid;

/// Largest file the test staging policy accepts.
pub const TEST_MAX_FILE_BYTES: u64 = 1024;

const BOUNDARY: &str = "touchgrass-test-boundary";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: None,
        },
        media_dir: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryEntityStore>,
    pub objects: Arc<InMemoryObjectStore>,
    pub config: ServerConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let objects = Arc::new(InMemoryObjectStore::default());
        Self::with_backend(test_config(), objects.clone(), objects)
    }

    /// An app whose media goes through `backend`. `objects` is the memory
    /// store the backend ultimately writes to, kept for assertions.
    pub fn with_backend(
        config: ServerConfig,
        objects: Arc<InMemoryObjectStore>,
        backend: Arc<dyn ObjectStore>,
    ) -> Self {
        let store = Arc::new(MemoryEntityStore::new());
        let policy = StagingPolicy {
            max_file_bytes: Some(TEST_MAX_FILE_BYTES),
            accepted_content_types: None,
        };
        let state = AppState::new(
            store.clone(),
            MediaRepository::new(backend, false),
            config.clone(),
            policy,
        );
        Self {
            router: build_app_router(state, &config),
            store,
            objects,
            config,
        }
    }

    /// A signed token for `user_id`.
    pub fn token_for(&self, user_id: EntityId) -> String {
        generate_token(user_id, Duration::minutes(15), &self.config.jwt).unwrap()
    }

    /// A token for a freshly created user holding the organizer role.
    pub async fn organizer_token(&self) -> String {
        let user_id = Uuid::new_v4();
        self.store.assign_role(user_id, ROLE_ORGANIZER).await;
        self.token_for(user_id)
    }

    /// A token for a user without any role.
    pub fn attendee_token(&self) -> String {
        self.token_for(Uuid::new_v4())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        token: Option<&str>,
        form: MultipartForm,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(form.finish())).unwrap())
            .await
    }
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `payload` part holding `json`.
    pub fn payload(mut self, json: &Value) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"payload\"\r\n\
                 Content-Type: application/json\r\n\r\n{json}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// A `media` file part.
    pub fn media(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"media\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn main_hall() -> Value {
    serde_json::json!({
        "name": "Main Hall",
        "address": "123 Elm St",
        "city": "Springfield",
        "zip_code": "62704",
        "capacity": 100,
        "rental_rate_per_hour": 50
    })
}
