//! JSON HTTP API for Eventhall.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! `eventhall-core` store traits.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET`    | `/health` | [`handlers::health`] |
//! | `POST`   | `/api/register` | [`handlers::account::register`] |
//! | `POST`   | `/api/login` | [`handlers::account::login`] |
//! | `POST`   | `/api/contact` | [`handlers::contact::submit`] |
//! | `GET`    | `/api/events` | [`handlers::events::list`] |
//! | `GET`    | `/api/admin/contacts` | [`handlers::contact::list`] |
//! | `GET`    | `/api/admin/events` | [`handlers::events::list`] |
//! | `POST`   | `/api/admin/events` | [`handlers::events::create`] |
//! | `PUT`    | `/api/admin/events/{id}` | [`handlers::events::update`] |
//! | `DELETE` | `/api/admin/events/{id}` | [`handlers::events::delete_one`] |
//! | `GET`    | `/api/admin/register` | [`handlers::account::list_registrations`] |
//!
//! Admin routes are not authenticated.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::{get, post, put},
};
use eventhall_core::{
  credential::{PasswordPolicy, PasswordPolicyConfig},
  store::{EventStore, IdentityStore, MessageStore},
};
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

use handlers::{account, contact, events, health};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `EVENTHALL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Origins allowed by CORS. Empty means any origin.
  pub allowed_origins:      Vec<String>,
  /// Answer logins for unknown emails with `404 User not found` instead of
  /// the generic `400 Invalid email or password`. Off by default because it
  /// lets callers enumerate registered emails.
  pub reveal_unknown_email: bool,
  pub password:             PasswordPolicyConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".to_string(),
      port:                 5001,
      store_path:           PathBuf::from("eventhall.db"),
      allowed_origins:      Vec::new(),
      reveal_unknown_email: false,
      password:             PasswordPolicyConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub policy: Arc<PasswordPolicy>,
  pub config: Arc<ServerConfig>,
}

/// Everything the router needs from a storage backend.
pub trait Backend:
  IdentityStore + EventStore + MessageStore + Clone + 'static
{
}

impl<T> Backend for T where
  T: IdentityStore + EventStore + MessageStore + Clone + 'static
{
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S: Backend>(state: AppState<S>) -> Router {
  let cors = cors_layer(&state.config.allowed_origins);

  Router::new()
    .route("/health",                 get(health::handler))
    // Accounts
    .route("/api/register",           post(account::register::<S>))
    .route("/api/login",              post(account::login::<S>))
    .route("/api/admin/register",     get(account::list_registrations::<S>))
    // Contact form
    .route("/api/contact",            post(contact::submit::<S>))
    .route("/api/admin/contacts",     get(contact::list::<S>))
    // Events
    .route("/api/events",             get(events::list::<S>))
    .route("/api/admin/events",       get(events::list::<S>).post(events::create::<S>))
    .route("/api/admin/events/{id}",  put(events::update::<S>).delete(events::delete_one::<S>))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  let layer = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([header::CONTENT_TYPE]);

  if origins.is_empty() {
    return layer.allow_origin(Any);
  }

  let allowed: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|origin| match HeaderValue::from_str(origin) {
      Ok(value) => Some(value),
      Err(_) => {
        tracing::warn!(%origin, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();
  layer.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
  };
  use eventhall_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn test_config() -> ServerConfig {
    ServerConfig {
      password: PasswordPolicyConfig {
        memory_kib:  64,
        iterations:  1,
        parallelism: 1,
        max_length:  64,
      },
      ..ServerConfig::default()
    }
  }

  async fn make_state(config: ServerConfig) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let policy = PasswordPolicy::new(&config.password).unwrap();
    AppState {
      store:  Arc::new(store),
      policy: Arc::new(policy),
      config: Arc::new(config),
    }
  }

  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn alice() -> Value {
    json!({ "name": "A", "email": "a@x.com", "password": "secret1", "event": "e1" })
  }

  fn launch_party() -> Value {
    json!({
      "name": "Launch party",
      "description": "Virtual launch",
      "date": "2025-06-01",
      "location": "Online"
    })
  }

  // ── Accounts ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_then_login_scenario() {
    let state = make_state(test_config()).await;

    let resp = send(&state, "POST", "/api/register", Some(alice())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["event"], "e1");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("credential").is_none());

    let resp = send(&state, "POST", "/api/register", Some(alice())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "User already exists");

    let login = json!({ "email": "a@x.com", "password": "secret1" });
    let resp = send(&state, "POST", "/api/login", Some(login)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["name"], "A");
    assert!(body["user"].get("credential").is_none());

    let wrong = json!({ "email": "a@x.com", "password": "wrong" });
    let resp = send(&state, "POST", "/api/login", Some(wrong)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Invalid email or password");
  }

  #[tokio::test]
  async fn register_missing_field_is_400() {
    let state = make_state(test_config()).await;
    let body = json!({ "name": "A", "email": "a@x.com", "password": "secret1" });
    let resp = send(&state, "POST", "/api/register", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "All fields are required");
  }

  #[tokio::test]
  async fn register_overlong_password_is_400() {
    let state = make_state(test_config()).await;
    let mut body = alice();
    body["password"] = json!("p".repeat(65));
    let resp = send(&state, "POST", "/api/register", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Invalid password");
  }

  #[tokio::test]
  async fn malformed_json_is_400() {
    let state = make_state(test_config()).await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/register")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn login_missing_field_is_400() {
    let state = make_state(test_config()).await;
    let resp = send(&state, "POST", "/api/login", Some(json!({ "email": "a@x.com" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      json_body(resp).await["message"],
      "Email and password are required"
    );
  }

  #[tokio::test]
  async fn login_unknown_email_is_generic_by_default() {
    let state = make_state(test_config()).await;
    let login = json!({ "email": "nobody@x.com", "password": "secret1" });
    let resp = send(&state, "POST", "/api/login", Some(login)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Invalid email or password");
  }

  #[tokio::test]
  async fn login_unknown_email_can_be_revealed() {
    let config = ServerConfig { reveal_unknown_email: true, ..test_config() };
    let state = make_state(config).await;

    let login = json!({ "email": "nobody@x.com", "password": "secret1" });
    let resp = send(&state, "POST", "/api/login", Some(login)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["message"], "User not found");

    send(&state, "POST", "/api/register", Some(alice())).await;
    let wrong = json!({ "email": "a@x.com", "password": "wrong" });
    let resp = send(&state, "POST", "/api/login", Some(wrong)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Invalid credentials");
  }

  #[tokio::test]
  async fn admin_registrations_hide_credentials() {
    let state = make_state(test_config()).await;
    send(&state, "POST", "/api/register", Some(alice())).await;

    let resp = send(&state, "GET", "/api/admin/register", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["email"], "a@x.com");
    assert!(!body.to_string().contains("argon2"));
  }

  // ── Events ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn event_crud_round() {
    let state = make_state(test_config()).await;

    let resp = send(&state, "POST", "/api/admin/events", Some(launch_party())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["message"], "Event created successfully");
    let id = body["event"]["event_id"].as_str().unwrap().to_owned();

    let resp = send(&state, "GET", "/api/events", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

    let patch = json!({ "location": "Main stage" });
    let resp = send(&state, "PUT", &format!("/api/admin/events/{id}"), Some(patch)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["event"]["location"], "Main stage");
    assert_eq!(body["event"]["name"], "Launch party");

    let resp = send(&state, "DELETE", &format!("/api/admin/events/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Event deleted successfully");

    let resp = send(&state, "GET", "/api/admin/events", None).await;
    assert!(json_body(resp).await.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_event_missing_field_is_400() {
    let state = make_state(test_config()).await;
    let mut body = launch_party();
    body["location"] = json!("  ");
    let resp = send(&state, "POST", "/api/admin/events", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "All fields are required");
  }

  #[tokio::test]
  async fn create_event_accepts_rfc3339_date() {
    let state = make_state(test_config()).await;
    let mut body = launch_party();
    body["date"] = json!("2025-06-01T18:30:00Z");
    let resp = send(&state, "POST", "/api/admin/events", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["event"]["date"], "2025-06-01");
  }

  #[tokio::test]
  async fn create_event_bad_date_is_400() {
    let state = make_state(test_config()).await;
    let mut body = launch_party();
    body["date"] = json!("next tuesday");
    let resp = send(&state, "POST", "/api/admin/events", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn update_with_empty_body_is_400() {
    let state = make_state(test_config()).await;
    let resp = send(&state, "POST", "/api/admin/events", Some(launch_party())).await;
    let id = json_body(resp).await["event"]["event_id"].as_str().unwrap().to_owned();

    let resp = send(&state, "PUT", &format!("/api/admin/events/{id}"), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn missing_event_is_404() {
    let state = make_state(test_config()).await;
    let id = uuid::Uuid::new_v4();

    let resp = send(&state, "DELETE", &format!("/api/admin/events/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["message"], "Event not found");

    let patch = json!({ "name": "x" });
    let resp = send(&state, "PUT", &format!("/api/admin/events/{id}"), Some(patch)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn malformed_event_id_is_400() {
    let state = make_state(test_config()).await;
    let resp = send(&state, "DELETE", "/api/admin/events/not-a-uuid", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Contact form ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn contact_submit_and_admin_list() {
    let state = make_state(test_config()).await;

    let msg = json!({ "name": "V", "email": "v@x.com", "message": "Hello" });
    let resp = send(&state, "POST", "/api/contact", Some(msg)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
      json_body(resp).await["message"],
      "Contact form submitted successfully"
    );

    let resp = send(&state, "GET", "/api/admin/contacts", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body[0]["message"], "Hello");
  }

  #[tokio::test]
  async fn contact_missing_field_is_400() {
    let state = make_state(test_config()).await;
    let msg = json!({ "name": "V", "email": "v@x.com" });
    let resp = send(&state, "POST", "/api/contact", Some(msg)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Misc ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_is_ok() {
    let state = make_state(test_config()).await;
    let resp = send(&state, "GET", "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "ok");
  }

  #[tokio::test]
  async fn cors_allowlist_is_applied() {
    let config = ServerConfig {
      allowed_origins: vec!["https://events.example".to_string()],
      ..test_config()
    };
    let state = make_state(config).await;

    let req = Request::builder()
      .method("GET")
      .uri("/api/events")
      .header(header::ORIGIN, "https://events.example")
      .body(Body::empty())
      .unwrap();
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "https://events.example"
    );

    let req = Request::builder()
      .method("GET")
      .uri("/api/events")
      .header(header::ORIGIN, "https://evil.example")
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
  }
}
