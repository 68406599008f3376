//! Contact — the sole persisted entity.
//!
//! A cluster is a two-level star: one primary at the root and any number of
//! secondaries whose `linked_id` points directly at it. Creation and
//! [`demote`](crate::ledger::ContactLedger::demote) are the only ways a
//! contact's link fields ever change.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned, monotonically increasing, never reused.
pub type ContactId = i64;

/// Whether a contact is the canonical record of its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPrecedence {
  Primary,
  Secondary,
}

impl LinkPrecedence {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Primary => "primary",
      Self::Secondary => "secondary",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:              ContactId,
  pub email:           Option<String>,
  pub phone_number:    Option<String>,
  /// `None` for primaries; the cluster primary's id for secondaries.
  pub linked_id:       Option<ContactId>,
  pub link_precedence: LinkPrecedence,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  pub deleted_at:      Option<DateTime<Utc>>,
}

impl Contact {
  pub fn is_primary(&self) -> bool {
    self.link_precedence == LinkPrecedence::Primary
  }

  pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }

  /// The id of the primary this contact hangs off (itself for a primary).
  pub fn root_id(&self) -> ContactId { self.linked_id.unwrap_or(self.id) }

  /// Oldest-wins ordering: earlier `created_at` first, lower `id` on ties.
  pub fn seniority(&self, other: &Self) -> Ordering {
    self
      .created_at
      .cmp(&other.created_at)
      .then(self.id.cmp(&other.id))
  }

  /// True if this row carries `value` as its email.
  pub fn has_email(&self, value: &str) -> bool {
    self.email.as_deref() == Some(value)
  }

  /// True if this row carries `value` as its phone number.
  pub fn has_phone(&self, value: &str) -> bool {
    self.phone_number.as_deref() == Some(value)
  }
}

/// Input to [`ContactLedger::insert`](crate::ledger::ContactLedger::insert).
/// Timestamps and the id are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
  pub email:           Option<String>,
  pub phone_number:    Option<String>,
  pub linked_id:       Option<ContactId>,
  pub link_precedence: LinkPrecedence,
}

impl NewContact {
  pub fn primary(email: Option<&str>, phone_number: Option<&str>) -> Self {
    Self {
      email:           email.map(str::to_owned),
      phone_number:    phone_number.map(str::to_owned),
      linked_id:       None,
      link_precedence: LinkPrecedence::Primary,
    }
  }

  pub fn secondary(
    email: Option<&str>,
    phone_number: Option<&str>,
    primary_id: ContactId,
  ) -> Self {
    Self {
      email:           email.map(str::to_owned),
      phone_number:    phone_number.map(str::to_owned),
      linked_id:       Some(primary_id),
      link_precedence: LinkPrecedence::Secondary,
    }
  }
}

/// Sort contacts into oldest-first order.
pub fn sort_by_seniority(contacts: &mut [Contact]) {
  contacts.sort_by(Contact::seniority);
}
