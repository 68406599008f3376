//! The boundary types: what comes in ([`Observation`]) and what goes out
//! ([`ConsolidatedIdentity`]).

use serde::{Deserialize, Serialize};

use crate::{Error, Result, contact::ContactId};

// ─── Observation ─────────────────────────────────────────────────────────────

/// A sighting of `(email, phone)`. At least one field is always present.
///
/// Fields are trimmed on construction and blank values count as absent, so
/// the engine never has to reason about empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
  email:        Option<String>,
  phone_number: Option<String>,
}

impl Observation {
  pub fn new(
    email: Option<impl Into<String>>,
    phone_number: Option<impl Into<String>>,
  ) -> Result<Self> {
    let email = normalize(email.map(Into::into));
    let phone_number = normalize(phone_number.map(Into::into));
    if email.is_none() && phone_number.is_none() {
      return Err(Error::InvalidObservation);
    }
    Ok(Self { email, phone_number })
  }

  pub fn email(&self) -> Option<&str> { self.email.as_deref() }

  pub fn phone_number(&self) -> Option<&str> { self.phone_number.as_deref() }
}

fn normalize(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

// ─── ConsolidatedIdentity ────────────────────────────────────────────────────

/// The externally visible view of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedIdentity {
  pub primary_contact_id:    ContactId,
  /// Primary's email first, then secondaries' in seniority order; no repeats.
  pub emails:                Vec<String>,
  pub phone_numbers:         Vec<String>,
  pub secondary_contact_ids: Vec<ContactId>,
}
