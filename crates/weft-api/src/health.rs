//! `GET /health` — readiness of the backing store.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use weft_core::store::ContactStore;

use crate::error::ApiError;

pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Value>, ApiError>
where
  S: ContactStore,
{
  store.ping().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "status": "ok" })))
}
