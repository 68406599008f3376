//! The `ContactStore` trait: the async surface outer layers talk to.
//!
//! The trait is implemented by storage backends (e.g. `weft-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.
//! Backends run [`consolidate`](crate::consolidate::consolidate) over their
//! own [`ContactLedger`](crate::ledger::ContactLedger) inside whatever
//! isolation they provide.

use std::future::Future;

use crate::{
  Classify,
  consolidate::Consolidation,
  contact::{Contact, ContactId},
  identity::{ConsolidatedIdentity, Observation},
};

/// Abstraction over a Weft contact store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Consolidation ─────────────────────────────────────────────────────

  /// Fold `observation` into the store and return the resulting identity.
  ///
  /// Either every write the consolidation needs lands, or none does.
  fn identify(
    &self,
    observation: Observation,
  ) -> impl Future<Output = Result<Consolidation, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Resolve `observation` without writing anything. Returns the identity of
  /// the oldest matching contact's cluster, or `None` when nothing matches.
  fn lookup(
    &self,
    observation: Observation,
  ) -> impl Future<Output = Result<Option<ConsolidatedIdentity>, Self::Error>> + Send + '_;

  /// Retrieve a contact row by id, tombstoned or not.
  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// List every row in id order.
  fn list_contacts(
    &self,
    include_deleted: bool,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Render the cluster containing `id`. `None` if `id` is unknown or
  /// tombstoned.
  fn identity_of(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<ConsolidatedIdentity>, Self::Error>> + Send + '_;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Stamp `deleted_at` on a contact.
  ///
  /// Refused for a primary that still has live secondaries, since that would
  /// leave them pointing at a tombstone.
  fn tombstone(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Cheap round trip proving the backend is ready to serve.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
