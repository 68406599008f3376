//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Optional `?include_deleted=true` |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `GET`    | `/contacts/:id/identity` | Consolidated view of the contact's cluster |
//! | `DELETE` | `/contacts/:id` | Tombstone; 409 for a primary with secondaries |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use serde::Deserialize;
use weft_core::{
  contact::{Contact, ContactId},
  store::ContactStore,
};

use crate::{error::ApiError, identify::IdentityResponse};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub include_deleted: bool,
}

/// `GET /contacts[?include_deleted=true]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let Query(params) = params?;
  let contacts = store
    .list_contacts(params.include_deleted)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<ContactId>, PathRejection>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let Path(id) = id?;
  let contact = store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(contact))
}

/// `GET /contacts/:id/identity`
pub async fn identity<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<ContactId>, PathRejection>,
) -> Result<Json<IdentityResponse>, ApiError>
where
  S: ContactStore,
{
  let Path(id) = id?;
  let identity = store
    .identity_of(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(IdentityResponse { contact: identity }))
}

// ─── Tombstone ────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id` — returns the tombstoned row.
pub async fn tombstone<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<ContactId>, PathRejection>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let Path(id) = id?;
  let contact = store.tombstone(id).await.map_err(ApiError::store)?;
  Ok(Json(contact))
}
