//! [`ContactLedger`] — the store contract the consolidation engine runs on.
//!
//! A ledger is the view of the store for the duration of one consolidation.
//! Implementations must give read-after-write visibility within that window
//! and make each `insert`/`demote` atomic. Backends that want the whole
//! consolidation to be all-or-nothing run it against a ledger bound to a
//! single transaction (see `weft-store-sqlite`).

use crate::contact::{Contact, ContactId, NewContact};

pub trait ContactLedger {
  /// Backend failure. Converting into [`crate::Error`] must keep the
  /// classification: a missing row stays `ContactNotFound`, a self-link
  /// stays `SelfLink`, and only genuine backend faults become `Store`.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// All live contacts whose email equals `email` OR whose phone equals
  /// `phone`, oldest first. Returns nothing when both are `None`.
  fn find_by_attributes(
    &mut self,
    email: Option<&str>,
    phone: Option<&str>,
  ) -> Result<Vec<Contact>, Self::Error>;

  /// The full star containing `contact_id`: its root primary plus every live
  /// contact linked to that root, oldest first. Unknown ids yield nothing.
  fn find_cluster(&mut self, contact_id: ContactId) -> Result<Vec<Contact>, Self::Error>;

  /// Persist a new row with `created_at = updated_at = now`.
  fn insert(&mut self, contact: NewContact) -> Result<Contact, Self::Error>;

  /// Mark `contact_id` secondary and point it at `linked_id`, bumping
  /// `updated_at`. Also used to re-point an existing secondary.
  fn demote(
    &mut self,
    contact_id: ContactId,
    linked_id: ContactId,
  ) -> Result<Contact, Self::Error>;
}
