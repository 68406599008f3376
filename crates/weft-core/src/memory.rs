//! [`MemoryLedger`] — a `BTreeMap`-backed [`ContactLedger`].
//!
//! Useful for embedding and for exercising the engine without a database.
//! Every call is trivially atomic; there is no transaction to roll back, so
//! callers wanting all-or-nothing semantics should use a real backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::contact::{Contact, ContactId, LinkPrecedence, NewContact, sort_by_seniority};

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
  #[error("contact not found: {0}")]
  NotFound(ContactId),

  #[error("contact {0} cannot be linked to itself")]
  SelfLink(ContactId),
}

impl From<MemoryError> for crate::Error {
  fn from(err: MemoryError) -> Self {
    match err {
      MemoryError::NotFound(id) => Self::ContactNotFound(id),
      MemoryError::SelfLink(id) => Self::SelfLink(id),
    }
  }
}

#[derive(Debug, Clone)]
enum Clock {
  System,
  /// Returns `next`, then advances it by `step`.
  Ticking { next: DateTime<Utc>, step: Duration },
}

#[derive(Debug, Clone)]
pub struct MemoryLedger {
  rows:    BTreeMap<ContactId, Contact>,
  next_id: ContactId,
  clock:   Clock,
}

impl Default for MemoryLedger {
  fn default() -> Self { Self::new() }
}

impl MemoryLedger {
  pub fn new() -> Self {
    Self { rows: BTreeMap::new(), next_id: 1, clock: Clock::System }
  }

  /// A ledger whose clock starts at `start` and advances by `step` on every
  /// write, giving reproducible `created_at` ordering.
  pub fn with_ticking_clock(start: DateTime<Utc>, step: Duration) -> Self {
    Self {
      clock: Clock::Ticking { next: start, step },
      ..Self::new()
    }
  }

  /// Seed a ledger with pre-existing rows, e.g. to replay a persisted table.
  pub fn from_rows(rows: impl IntoIterator<Item = Contact>) -> Self {
    let rows: BTreeMap<_, _> = rows.into_iter().map(|c| (c.id, c)).collect();
    let next_id = rows.keys().next_back().map_or(1, |id| id + 1);
    Self { rows, next_id, clock: Clock::System }
  }

  /// Every row, tombstoned ones included, in id order.
  pub fn rows(&self) -> impl Iterator<Item = &Contact> { self.rows.values() }

  pub fn get(&self, id: ContactId) -> Option<&Contact> { self.rows.get(&id) }

  /// Set `deleted_at`; returns `false` if the row is unknown.
  pub fn tombstone(&mut self, id: ContactId) -> bool {
    let now = self.now();
    match self.rows.get_mut(&id) {
      Some(row) => {
        row.deleted_at = Some(now);
        row.updated_at = now;
        true
      }
      None => false,
    }
  }

  fn now(&mut self) -> DateTime<Utc> {
    match &mut self.clock {
      Clock::System => Utc::now(),
      Clock::Ticking { next, step } => {
        let at = *next;
        *next += *step;
        at
      }
    }
  }

  fn live(&self) -> impl Iterator<Item = &Contact> {
    self.rows.values().filter(|c| !c.is_deleted())
  }
}

impl crate::ledger::ContactLedger for MemoryLedger {
  type Error = MemoryError;

  fn find_by_attributes(
    &mut self,
    email: Option<&str>,
    phone: Option<&str>,
  ) -> Result<Vec<Contact>, MemoryError> {
    let mut found: Vec<Contact> = self
      .live()
      .filter(|c| {
        email.is_some_and(|e| c.has_email(e)) || phone.is_some_and(|p| c.has_phone(p))
      })
      .cloned()
      .collect();
    sort_by_seniority(&mut found);
    Ok(found)
  }

  fn find_cluster(&mut self, contact_id: ContactId) -> Result<Vec<Contact>, MemoryError> {
    let Some(root) = self.rows.get(&contact_id).map(Contact::root_id) else {
      return Ok(Vec::new());
    };
    let mut members: Vec<Contact> = self
      .live()
      .filter(|c| c.id == root || c.linked_id == Some(root))
      .cloned()
      .collect();
    sort_by_seniority(&mut members);
    Ok(members)
  }

  fn insert(&mut self, contact: NewContact) -> Result<Contact, MemoryError> {
    let now = self.now();
    let row = Contact {
      id:              self.next_id,
      email:           contact.email,
      phone_number:    contact.phone_number,
      linked_id:       contact.linked_id,
      link_precedence: contact.link_precedence,
      created_at:      now,
      updated_at:      now,
      deleted_at:      None,
    };
    self.next_id += 1;
    self.rows.insert(row.id, row.clone());
    Ok(row)
  }

  fn demote(
    &mut self,
    contact_id: ContactId,
    linked_id: ContactId,
  ) -> Result<Contact, MemoryError> {
    if contact_id == linked_id {
      return Err(MemoryError::SelfLink(contact_id));
    }
    let now = self.now();
    let row = self
      .rows
      .get_mut(&contact_id)
      .ok_or(MemoryError::NotFound(contact_id))?;
    row.link_precedence = LinkPrecedence::Secondary;
    row.linked_id = Some(linked_id);
    row.updated_at = now;
    Ok(row.clone())
  }
}
