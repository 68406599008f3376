//! The consolidation engine.
//!
//! For one [`Observation`] the engine:
//!
//! 1. resolves every cluster sharing the email or the phone number;
//! 2. creates a fresh primary if nothing matched;
//! 3. otherwise merges all matched clusters under the oldest primary,
//!    re-pointing every member of the younger clusters straight at it;
//! 4. inserts a secondary if the observation carries a value the merged
//!    cluster has never seen;
//! 5. re-reads the surviving star and renders it.
//!
//! The engine holds no state of its own. Atomicity across the writes of one
//! call is the ledger's business.

use crate::{
  Error, Result,
  contact::{Contact, ContactId, NewContact},
  identity::{ConsolidatedIdentity, Observation},
  ledger::ContactLedger,
  resolve::{Cluster, cluster_of, resolve_all},
  view,
};

/// What one consolidation did, for the caller to log or inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consolidation {
  pub identity: ConsolidatedIdentity,
  /// The row inserted by this call, if any.
  pub created:  Option<Contact>,
  /// Rows whose link was rewritten (former primaries and their secondaries).
  pub demoted:  Vec<ContactId>,
}

pub fn consolidate<L: ContactLedger>(
  ledger: &mut L,
  observation: &Observation,
) -> Result<Consolidation> {
  let email = observation.email();
  let phone = observation.phone_number();

  let clusters = resolve_all(ledger, email, phone)?;
  let Some((survivor, absorbed)) = clusters.split_first() else {
    let contact = ledger
      .insert(NewContact::primary(email, phone))
      .map_err(Into::<Error>::into)?;
    let identity = view::render(std::slice::from_ref(&contact))?;
    return Ok(Consolidation { identity, created: Some(contact), demoted: Vec::new() });
  };

  let primary_id = survivor.primary_id();
  let mut demoted = Vec::new();
  for cluster in absorbed {
    demoted.extend(absorb(ledger, cluster, primary_id)?);
  }

  let merged = if absorbed.is_empty() {
    survivor.clone()
  } else {
    cluster_of(ledger, primary_id)?
  };

  let created = if contributes_new_value(&merged, email, phone) {
    let contact = ledger
      .insert(NewContact::secondary(email, phone, primary_id))
      .map_err(Into::<Error>::into)?;
    Some(contact)
  } else {
    None
  };

  let cluster = cluster_of(ledger, primary_id)?;
  Ok(Consolidation {
    identity: view::render_cluster(&cluster),
    created,
    demoted,
  })
}

/// Demote `cluster`'s primary under `primary_id` and re-point each of its
/// secondaries there too, keeping the star two levels deep.
fn absorb<L: ContactLedger>(
  ledger: &mut L,
  cluster: &Cluster,
  primary_id: ContactId,
) -> Result<Vec<ContactId>> {
  let mut rewritten = Vec::with_capacity(cluster.members.len());
  let former_primary = std::iter::once(&cluster.primary);
  for member in former_primary.chain(cluster.secondaries()) {
    ledger.demote(member.id, primary_id).map_err(Into::<Error>::into)?;
    rewritten.push(member.id);
  }
  Ok(rewritten)
}

/// True if either supplied attribute is absent from every member.
fn contributes_new_value(
  cluster: &Cluster,
  email: Option<&str>,
  phone: Option<&str>,
) -> bool {
  email.is_some_and(|e| !cluster.contains_email(e))
    || phone.is_some_and(|p| !cluster.contains_phone(p))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
