//! Handlers for identity resolution.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/identify` | Body: [`IdentifyBody`]; consolidates and returns the identity |
//! | `GET`  | `/identity` | `?email` and/or `?phoneNumber`; read-only, 404 if nothing matches |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
};
use serde::{Deserialize, Serialize};
use weft_core::{
  identity::{ConsolidatedIdentity, Observation},
  store::ContactStore,
};

use crate::error::ApiError;

// ─── Bodies ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /identify`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyBody {
  pub email:        Option<String>,
  pub phone_number: Option<PhoneNumber>,
}

/// Clients send phone numbers both as strings and as bare JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PhoneNumber {
  Text(String),
  Number(serde_json::Number),
}

impl From<PhoneNumber> for String {
  fn from(p: PhoneNumber) -> Self {
    match p {
      PhoneNumber::Text(s) => s,
      PhoneNumber::Number(n) => n.to_string(),
    }
  }
}

impl TryFrom<IdentifyBody> for Observation {
  type Error = weft_core::Error;

  fn try_from(b: IdentifyBody) -> Result<Self, Self::Error> {
    Observation::new(b.email, b.phone_number.map(String::from))
  }
}

/// The envelope every identity response is wrapped in.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
  pub contact: ConsolidatedIdentity,
}

// ─── Identify ─────────────────────────────────────────────────────────────────

/// `POST /identify` — body: `{"email":"...","phoneNumber":"..."}`, either
/// field optional but not both.
pub async fn identify<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<IdentifyBody>, JsonRejection>,
) -> Result<Json<IdentityResponse>, ApiError>
where
  S: ContactStore,
{
  let Json(body) = body?;
  let observation = Observation::try_from(body)?;
  let consolidation = store
    .identify(observation)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(IdentityResponse { contact: consolidation.identity }))
}

// ─── Lookup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
  pub email:        Option<String>,
  pub phone_number: Option<String>,
}

/// `GET /identity[?email=...][&phoneNumber=...]`
pub async fn lookup<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<IdentityResponse>, ApiError>
where
  S: ContactStore,
{
  let Query(params) = params?;
  let observation = Observation::new(params.email, params.phone_number)?;
  let identity = store
    .lookup(observation)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("no contact matches".to_owned()))?;
  Ok(Json(IdentityResponse { contact: identity }))
}
