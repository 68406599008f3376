//! View Builder: project a cluster into a [`ConsolidatedIdentity`].

use crate::{
  Result,
  contact::Contact,
  identity::ConsolidatedIdentity,
  resolve::Cluster,
};

/// Render a cluster's members. Fails with an integrity fault unless exactly
/// one member is primary.
pub fn render(members: &[Contact]) -> Result<ConsolidatedIdentity> {
  let cluster = Cluster::from_members(members.to_vec())?;
  Ok(render_cluster(&cluster))
}

/// Render an already-validated cluster.
pub fn render_cluster(cluster: &Cluster) -> ConsolidatedIdentity {
  let mut emails: Vec<String> = Vec::new();
  let mut phone_numbers: Vec<String> = Vec::new();
  let mut secondary_contact_ids = Vec::new();

  let contributors =
    std::iter::once(&cluster.primary).chain(cluster.secondaries());
  for contact in contributors {
    push_unique(&mut emails, contact.email.as_deref());
    push_unique(&mut phone_numbers, contact.phone_number.as_deref());
    if !contact.is_primary() {
      secondary_contact_ids.push(contact.id);
    }
  }

  ConsolidatedIdentity {
    primary_contact_id: cluster.primary.id,
    emails,
    phone_numbers,
    secondary_contact_ids,
  }
}

fn push_unique(values: &mut Vec<String>, value: Option<&str>) {
  if let Some(v) = value.filter(|v| !v.is_empty())
    && !values.iter().any(|existing| existing == v)
  {
    values.push(v.to_owned());
  }
}
