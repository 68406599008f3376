//! Error type for `weft-store-sqlite`.

use thiserror::Error;
use weft_core::{Classify, ErrorKind, contact::ContactId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] weft_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown link precedence: {0:?}")]
  UnknownPrecedence(String),

  #[error("contact not found: {0}")]
  ContactNotFound(ContactId),

  #[error("contact {0} cannot be linked to itself")]
  SelfLink(ContactId),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::ContactNotFound(_) => ErrorKind::NotFound,
      Error::SelfLink(_) => ErrorKind::Conflict,
      Error::Database(_)
      | Error::Sqlite(_)
      | Error::DateParse(_)
      | Error::UnknownPrecedence(_) => ErrorKind::Store,
    }
  }
}

/// Ledger errors surface through the engine as core errors; the
/// classification must match what [`Classify::kind`] reports for `err`.
impl From<Error> for weft_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::ContactNotFound(id) => weft_core::Error::ContactNotFound(id),
      Error::SelfLink(id) => weft_core::Error::SelfLink(id),
      other => weft_core::Error::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
