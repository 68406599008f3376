//! Core types, contracts, and the consolidation algorithm for Weft.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`ledger::ContactLedger`] (the synchronous, per-operation
//! view the engine drives) and [`store::ContactStore`] (the async surface
//! outer layers call).

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod consolidate;
pub mod contact;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod memory;
pub mod resolve;
pub mod store;
pub mod view;

pub use error::{Classify, Error, ErrorKind, Result};
