//! SQLite backend for the Weft contact store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each consolidation runs inside one
//! transaction on that thread.

mod encode;
mod ledger;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use ledger::SqliteLedger;
pub use store::SqliteStore;
