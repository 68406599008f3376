//! JSON REST API for Weft.
//!
//! Exposes an axum [`Router`] backed by any [`weft_core::store::ContactStore`].
//! TLS, timeouts, and request tracing are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(weft_api::api_router(store.clone()))
//! ```

pub mod contacts;
pub mod error;
pub mod health;
pub mod identify;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use weft_core::store::ContactStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    // Identity
    .route("/identify", post(identify::identify::<S>))
    .route("/identity", get(identify::lookup::<S>))
    // Contacts
    .route("/contacts", get(contacts::list::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>).delete(contacts::tombstone::<S>),
    )
    .route("/contacts/{id}/identity", get(contacts::identity::<S>))
    // Health
    .route("/health", get(health::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use weft_store_sqlite::SqliteStore;

  async fn make_router() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = router
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn identify(router: &Router, body: Value) -> (StatusCode, Value) {
    send(router, "POST", "/identify", Some(body)).await
  }

  // ── POST /identify ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn identify_walks_through_create_link_and_merge() {
    let router = make_router().await;

    let (status, body) = identify(&router, json!({ "email": "a@x.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "contact": {
      "primaryContactId": 1,
      "emails": ["a@x.com"],
      "phoneNumbers": [],
      "secondaryContactIds": []
    }}));

    let (_, body) =
      identify(&router, json!({ "email": "a@x.com", "phoneNumber": "555" })).await;
    assert_eq!(body["contact"]["phoneNumbers"], json!(["555"]));
    assert_eq!(body["contact"]["secondaryContactIds"], json!([2]));

    identify(&router, json!({ "phoneNumber": "777" })).await;
    let (_, body) =
      identify(&router, json!({ "email": "a@x.com", "phoneNumber": "777" })).await;
    assert_eq!(body["contact"]["primaryContactId"], 1);
    assert_eq!(body["contact"]["phoneNumbers"], json!(["555", "777"]));
    assert_eq!(body["contact"]["secondaryContactIds"], json!([2, 3]));
  }

  #[tokio::test]
  async fn numeric_phone_number_is_accepted() {
    let router = make_router().await;
    let (status, body) = identify(&router, json!({ "phoneNumber": 123456 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact"]["phoneNumbers"], json!(["123456"]));

    let (_, body) = identify(&router, json!({ "phoneNumber": "123456" })).await;
    assert_eq!(body["contact"]["primaryContactId"], 1);
  }

  #[tokio::test]
  async fn empty_observation_is_bad_request() {
    let router = make_router().await;

    let (status, body) = identify(&router, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_observation");

    let (status, _) =
      identify(&router, json!({ "email": "  ", "phoneNumber": null })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn malformed_bodies_get_json_bad_request() {
    let router = make_router().await;

    for body in [json!({ "email": 5 }), json!({ "phoneNumber": true })] {
      let (status, resp) = identify(&router, body.clone()).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
      assert_eq!(resp["kind"], "invalid_observation", "body: {body}");
      assert!(resp["error"].is_string());
    }

    let req = Request::builder()
      .method("POST")
      .uri("/identify")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(r#"{"email": "a@x"#))
      .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let resp: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp["kind"], "invalid_observation");

    let (_, body) = send(&router, "GET", "/contacts", None).await;
    assert_eq!(body, json!([]), "nothing written");
  }

  #[tokio::test]
  async fn malformed_query_and_path_get_json_bad_request() {
    let router = make_router().await;

    let (status, body) = send(&router, "GET", "/contacts?include_deleted=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_observation");

    let (status, body) = send(&router, "GET", "/contacts/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_observation");

    let (status, body) = send(&router, "GET", "/identity?email=a@x&email=b@x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_observation");
  }

  // ── GET /identity ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn lookup_returns_404_until_identified() {
    let router = make_router().await;

    let (status, _) = send(&router, "GET", "/identity?phoneNumber=555", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    identify(&router, json!({ "email": "a@x.com", "phoneNumber": "555" })).await;
    let (status, body) = send(&router, "GET", "/identity?phoneNumber=555", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact"]["emails"], json!(["a@x.com"]));
  }

  // ── /contacts ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn contacts_expose_rows_and_cluster_view() {
    let router = make_router().await;
    identify(&router, json!({ "email": "a@x.com" })).await;
    identify(&router, json!({ "email": "a@x.com", "phoneNumber": "555" })).await;

    let (status, body) = send(&router, "GET", "/contacts/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["linkPrecedence"], "secondary");
    assert_eq!(body["linkedId"], 1);
    assert_eq!(body["deletedAt"], Value::Null);

    let (_, body) = send(&router, "GET", "/contacts/2/identity", None).await;
    assert_eq!(body["contact"]["primaryContactId"], 1);

    let (_, body) = send(&router, "GET", "/contacts", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&router, "GET", "/contacts/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_tombstones_secondary_but_refuses_busy_primary() {
    let router = make_router().await;
    identify(&router, json!({ "email": "a@x.com" })).await;
    identify(&router, json!({ "email": "a@x.com", "phoneNumber": "555" })).await;

    let (status, body) = send(&router, "DELETE", "/contacts/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    let (status, body) = send(&router, "DELETE", "/contacts/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["deletedAt"].is_string());

    let (_, body) = send(&router, "GET", "/contacts", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = send(&router, "GET", "/contacts?include_deleted=true", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&router, "DELETE", "/contacts/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── /health ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_ok() {
    let router = make_router().await;
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
  }
}
