//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::TransactionBehavior;
use weft_core::{
  Classify, ErrorKind,
  consolidate::{Consolidation, consolidate},
  contact::{Contact, ContactId},
  identity::{ConsolidatedIdentity, Observation},
  resolve::{cluster_of, resolve},
  store::ContactStore,
  view::render_cluster,
};

use crate::{Result, SqliteLedger, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Weft contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one connection thread, so calls are serialized in-process; writes
/// additionally take SQLite's write lock up front (`BEGIN IMMEDIATE`) so
/// separate processes cannot interleave two consolidations.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` against a ledger bound to one transaction. The transaction
  /// commits only if `f` succeeds; any error rolls back every write.
  pub(crate) async fn transact<T, F>(
    &self,
    behavior: TransactionBehavior,
    f: F,
  ) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteLedger<'_>) -> weft_core::Result<T> + Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(behavior)?;
        let outcome = f(&mut SqliteLedger::new(&tx));
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?;
    Ok(outcome?)
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn identify(&self, observation: Observation) -> Result<Consolidation> {
    let result = self
      .transact(TransactionBehavior::Immediate, move |ledger| {
        consolidate(ledger, &observation)
      })
      .await;

    match &result {
      Ok(out) => tracing::info!(
        primary = out.identity.primary_contact_id,
        created = ?out.created.as_ref().map(|c| c.id),
        demoted = ?out.demoted,
        "consolidated observation"
      ),
      Err(e) if e.kind() == ErrorKind::IntegrityFault => {
        tracing::warn!(error = %e, "consolidation hit an integrity fault");
      }
      Err(_) => {}
    }
    result
  }

  async fn lookup(&self, observation: Observation) -> Result<Option<ConsolidatedIdentity>> {
    self
      .transact(TransactionBehavior::Deferred, move |ledger| {
        let cluster = resolve(ledger, observation.email(), observation.phone_number())?;
        Ok(cluster.as_ref().map(render_cluster))
      })
      .await
  }

  async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    self
      .transact(TransactionBehavior::Deferred, move |ledger| {
        ledger.get(id).map_err(weft_core::Error::from)
      })
      .await
  }

  async fn list_contacts(&self, include_deleted: bool) -> Result<Vec<Contact>> {
    self
      .transact(TransactionBehavior::Deferred, move |ledger| {
        ledger.list(include_deleted).map_err(weft_core::Error::from)
      })
      .await
  }

  async fn identity_of(&self, id: ContactId) -> Result<Option<ConsolidatedIdentity>> {
    self
      .transact(TransactionBehavior::Deferred, move |ledger| {
        let live = ledger
          .get(id)
          .map_err(weft_core::Error::from)?
          .is_some_and(|c| !c.is_deleted());
        if !live {
          return Ok(None);
        }
        let cluster = cluster_of(ledger, id)?;
        Ok(Some(render_cluster(&cluster)))
      })
      .await
  }

  async fn tombstone(&self, id: ContactId) -> Result<Contact> {
    let contact = self
      .transact(TransactionBehavior::Immediate, move |ledger| {
        let row = ledger
          .get(id)
          .map_err(weft_core::Error::from)?
          .filter(|c| !c.is_deleted())
          .ok_or(weft_core::Error::ContactNotFound(id))?;
        if row.is_primary()
          && ledger.count_secondaries(id).map_err(weft_core::Error::from)? > 0
        {
          return Err(weft_core::Error::PrimaryHasSecondaries(id));
        }
        ledger.tombstone(id).map_err(weft_core::Error::from)
      })
      .await?;

    tracing::info!(id, "tombstoned contact");
    Ok(contact)
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
