//! Token contract transaction reconciliation.
//!
//! Fetches recent operations touching a token contract from an indexed
//! chain query service, decodes each contract call into a semantic
//! transfer/mint/burn event, and merges the events into a wallet's stored
//! transaction list without duplication.

pub mod classifier;
pub mod client;
pub mod errors;
pub mod logger;
pub mod micheline;
pub mod query;
pub mod reconciler;
pub mod state;
pub mod types;

pub use classifier::{classify_operation, Classification, SkipReason};
pub use client::{ConseilClient, OperationSource};
pub use errors::{SyncError, SyncResult};
pub use reconciler::{ReconcileReport, ReconcilerConfig, TokenReconciler};
pub use state::sync_with_state;
pub use types::{EntryPoint, NodeConfig, RawOperation, TokenTransaction, TransactionStatus};
