//! Error types for `weft-core`.

use thiserror::Error;

use crate::contact::ContactId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("observation carries neither an email nor a phone number")]
  InvalidObservation,

  /// A resolved cluster does not have exactly one primary. Indicates prior
  /// corruption or a lost merge race; never repaired automatically.
  #[error("integrity fault: cluster {cluster:?} has {primaries} primaries")]
  IntegrityFault {
    cluster:   Vec<ContactId>,
    primaries: usize,
  },

  #[error("contact not found: {0}")]
  ContactNotFound(ContactId),

  #[error("contact {0} cannot be linked to itself")]
  SelfLink(ContactId),

  #[error("contact {0} is a primary with live secondaries")]
  PrimaryHasSecondaries(ContactId),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend fault that has no more specific classification.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub(crate) fn integrity(cluster: &[crate::contact::Contact], primaries: usize) -> Self {
    Self::IntegrityFault {
      cluster: cluster.iter().map(|c| c.id).collect(),
      primaries,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse failure classes that transport layers map onto protocol statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  InvalidObservation,
  NotFound,
  Conflict,
  IntegrityFault,
  Store,
}

impl ErrorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::InvalidObservation => "invalid_observation",
      Self::NotFound => "not_found",
      Self::Conflict => "conflict",
      Self::IntegrityFault => "integrity_fault",
      Self::Store => "store",
    }
  }
}

/// Implemented by every store error type so callers can tell integrity drift
/// apart from plain backend failures without knowing the backend.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidObservation => ErrorKind::InvalidObservation,
      Self::IntegrityFault { .. } => ErrorKind::IntegrityFault,
      Self::ContactNotFound(_) => ErrorKind::NotFound,
      Self::SelfLink(_) | Self::PrimaryHasSecondaries(_) => ErrorKind::Conflict,
      Self::Store(_) => ErrorKind::Store,
    }
  }
}
