// Reconciliation orchestration for one token contract.
//
// A pass fetches recent operations touching the contract through two
// concurrent queries (direct: manager-initiated calls; indirect: third-party
// calls that reference the manager in their parameters), classifies every
// row into a semantic token event, and merges the events into the wallet's
// stored transaction list.
//
// Callers must keep at most one pass in flight per token address; the
// reconciler holds no lock over the caller's state snapshot.

use futures::future::try_join;

use crate::classifier::{classify_operation, Classification, SkipReason};
use crate::client::OperationSource;
use crate::errors::SyncResult;
use crate::logger::{self, LogTag};
use crate::query::{OperationQuery, Operator, SortDirection};
use crate::state::sync_with_state;
use crate::types::{RawOperation, TokenTransaction};

/// Field projection shared by both queries
const OPERATION_FIELDS: [&str; 10] = [
    "timestamp",
    "block_level",
    "source",
    "destination",
    "amount",
    "kind",
    "fee",
    "status",
    "operation_group_hash",
    "parameters",
];

// =============================================================================
// CONFIGURATION AND REPORT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Row cap applied to each of the two queries
    pub row_limit: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self { row_limit: 1_000 }
    }
}

/// One raw row that produced no event, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOperation {
    pub operation_group_hash: String,
    pub reason: SkipReason,
}

/// Outcome accounting for one reconciliation pass.
///
/// Skipped rows are surfaced here instead of vanishing: a caller that wants
/// to show "unparsed activity" renders them from this report.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Raw rows returned by the two queries combined
    pub fetched: usize,
    /// Rows that decoded into a token event
    pub classified: usize,
    /// Whether the fetch itself failed and the pass degraded to an empty batch
    pub fetch_failed: bool,
    pub skipped: Vec<SkippedOperation>,
}

impl ReconcileReport {
    pub fn skipped_count(&self, label: &str) -> usize {
        self.skipped.iter().filter(|s| s.reason.label() == label).count()
    }
}

// =============================================================================
// RECONCILER
// =============================================================================

/// Reconciles one token contract's on-chain activity into wallet state
pub struct TokenReconciler<S: OperationSource> {
    source: S,
    token_address: String,
    manager_address: String,
    config: ReconcilerConfig,
}

impl<S: OperationSource> TokenReconciler<S> {
    pub fn new(source: S, token_address: &str, manager_address: &str) -> Self {
        Self {
            source,
            token_address: token_address.to_string(),
            manager_address: manager_address.to_string(),
            config: ReconcilerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    // Operations sent by the manager to the token contract
    fn direct_query(&self) -> OperationQuery {
        self.base_query().with_predicate("source", Operator::Eq, &self.manager_address)
    }

    // Third-party operations whose call parameters reference the manager
    fn indirect_query(&self) -> OperationQuery {
        self.base_query()
            .with_predicate("parameters", Operator::Like, &self.manager_address)
    }

    fn base_query(&self) -> OperationQuery {
        OperationQuery::new()
            .with_fields(&OPERATION_FIELDS)
            .with_predicate("kind", Operator::Eq, "transaction")
            .with_predicate("status", Operator::Eq, "applied")
            .with_predicate("destination", Operator::Eq, &self.token_address)
            .with_ordering("timestamp", SortDirection::Desc)
            .with_limit(self.config.row_limit)
    }

    /// Fetch recent operations touching the token contract.
    ///
    /// Both queries are dispatched concurrently and joined; the combined
    /// result is re-sorted ascending by timestamp, since each query returns
    /// its own descending-ordered window.
    pub async fn fetch_token_operations(&self) -> SyncResult<Vec<RawOperation>> {
        let (direct, indirect) = try_join(
            self.source.fetch_operations(&self.direct_query()),
            self.source.fetch_operations(&self.indirect_query()),
        )
        .await?;

        let mut operations = direct;
        operations.extend(indirect);
        operations.sort_by_key(|op| op.timestamp);

        logger::debug(
            LogTag::Reconciler,
            "FETCH",
            &format!(
                "fetched {} operations for token {}",
                operations.len(),
                self.token_address
            ),
        );

        Ok(operations)
    }

    /// Run one reconciliation pass against the stored transaction list.
    ///
    /// A fetch failure is never fatal: the pass logs it and degrades to an
    /// empty batch, leaving the stored list unchanged.
    pub async fn sync_transactions(
        &self,
        existing: Vec<TokenTransaction>,
    ) -> (Vec<TokenTransaction>, ReconcileReport) {
        let mut report = ReconcileReport::default();

        let operations = match self.fetch_token_operations().await {
            Ok(ops) => ops,
            Err(e) => {
                logger::error(
                    LogTag::Reconciler,
                    "FETCH",
                    &format!(
                        "operation fetch failed for token {}: {}",
                        self.token_address, e
                    ),
                );
                report.fetch_failed = true;
                Vec::new()
            }
        };
        report.fetched = operations.len();

        let mut events = Vec::with_capacity(operations.len());
        for op in &operations {
            match classify_operation(op, &self.manager_address) {
                Classification::Event(tx) => events.push(tx),
                Classification::Skipped(reason) => {
                    logger::debug(
                        LogTag::Classifier,
                        "SKIP",
                        &format!("{}: {:?}", op.operation_group_hash, reason),
                    );
                    report.skipped.push(SkippedOperation {
                        operation_group_hash: op.operation_group_hash.clone(),
                        reason,
                    });
                }
            }
        }
        report.classified = events.len();

        logger::info(
            LogTag::Reconciler,
            "SYNC",
            &format!(
                "token {}: {} fetched, {} classified, {} skipped",
                self.token_address,
                report.fetched,
                report.classified,
                report.skipped.len()
            ),
        );

        (sync_with_state(events, existing), report)
    }
}
