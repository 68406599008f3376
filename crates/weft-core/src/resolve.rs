//! Cluster resolution: from partial attributes to the full star(s) they touch.

use crate::{
  Error, Result,
  contact::{Contact, ContactId, sort_by_seniority},
  ledger::ContactLedger,
};

/// A resolved star with its primary pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
  pub primary: Contact,
  /// Every live member including the primary, oldest first.
  pub members: Vec<Contact>,
}

impl Cluster {
  /// Validate a `find_cluster` result: exactly one primary, or an
  /// [`Error::IntegrityFault`]. Members are put into seniority order.
  pub fn from_members(mut members: Vec<Contact>) -> Result<Self> {
    sort_by_seniority(&mut members);
    let mut primaries = members.iter().filter(|c| c.is_primary());
    let primary = match (primaries.next(), primaries.next()) {
      (Some(p), None) => p.clone(),
      _ => {
        let count = members.iter().filter(|c| c.is_primary()).count();
        return Err(Error::integrity(&members, count));
      }
    };
    Ok(Self { primary, members })
  }

  pub fn primary_id(&self) -> ContactId { self.primary.id }

  pub fn secondaries(&self) -> impl Iterator<Item = &Contact> {
    self.members.iter().filter(|c| !c.is_primary())
  }

  pub fn contains_email(&self, email: &str) -> bool {
    self.members.iter().any(|c| c.has_email(email))
  }

  pub fn contains_phone(&self, phone: &str) -> bool {
    self.members.iter().any(|c| c.has_phone(phone))
  }
}

/// Load and validate the star containing `contact_id`.
pub fn cluster_of<L: ContactLedger>(
  ledger: &mut L,
  contact_id: ContactId,
) -> Result<Cluster> {
  let members = ledger.find_cluster(contact_id).map_err(Into::<Error>::into)?;
  Cluster::from_members(members)
}

/// Resolve the cluster of the oldest contact matching either attribute.
///
/// `Ok(None)` means the observation is wholly novel. This only looks at one
/// star; use [`resolve_all`] when an observation may bridge several.
pub fn resolve<L: ContactLedger>(
  ledger: &mut L,
  email: Option<&str>,
  phone: Option<&str>,
) -> Result<Option<Cluster>> {
  let matches = ledger
    .find_by_attributes(email, phone)
    .map_err(Into::<Error>::into)?;
  match matches.first() {
    Some(first) => cluster_of(ledger, first.id).map(Some),
    None => Ok(None),
  }
}

/// Resolve every distinct cluster touched by either attribute, oldest
/// primary first. Empty when nothing matches.
pub fn resolve_all<L: ContactLedger>(
  ledger: &mut L,
  email: Option<&str>,
  phone: Option<&str>,
) -> Result<Vec<Cluster>> {
  let matches = ledger
    .find_by_attributes(email, phone)
    .map_err(Into::<Error>::into)?;

  let mut clusters: Vec<Cluster> = Vec::new();
  for contact in &matches {
    // Matches from an already-loaded star add nothing.
    if clusters
      .iter()
      .any(|c| c.members.iter().any(|m| m.id == contact.id))
    {
      continue;
    }
    let cluster = cluster_of(ledger, contact.id)?;
    if clusters.iter().any(|c| c.primary_id() == cluster.primary_id()) {
      continue;
    }
    clusters.push(cluster);
  }

  clusters.sort_by(|a, b| a.primary.seniority(&b.primary));
  Ok(clusters)
}
