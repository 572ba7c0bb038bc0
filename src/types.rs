// =============================================================================
// CORE DATA STRUCTURES
// =============================================================================

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Chain node endpoint descriptor for the query service.
///
/// Passed explicitly into the client layer; never read from ambient/global
/// state so two reconcilers can target different networks side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Base URL of the chain query service (no trailing slash)
    pub url: String,
    /// API key sent with every query request
    pub api_key: String,
    /// Network name, also the path segment of the data endpoint (e.g. "mainnet")
    pub network: String,
}

/// One raw operation row as returned by the chain query service.
///
/// Field names mirror the indexed ledger schema; rows for non-contract-call
/// operations may omit `parameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOperation {
    /// Ledger timestamp in milliseconds since epoch
    pub timestamp: i64,
    pub block_level: i64,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub amount: i64,
    pub kind: String,
    #[serde(default)]
    pub fee: i64,
    pub status: String,
    /// Group-level identifier, unique per on-chain operation
    pub operation_group_hash: String,
    /// Contract call parameters in the chain's nested-pair textual encoding
    #[serde(default)]
    pub parameters: Option<String>,
}

impl RawOperation {
    /// Ledger timestamp as a UTC datetime
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Chain-level outcome of a classified transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Present on chain and applied
    Ready,
    /// Present on chain but not applied (backtracked, failed, skipped)
    Failed,
}

/// Named contract method invoked by a call, when not a plain transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Mint,
    Burn,
}

/// One semantic token event derived from a raw operation.
///
/// This is the record the wallet state store persists and renders. Burns
/// carry a negative amount relative to the manager; mints and burns have
/// the manager substituted as counter-party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransaction {
    /// De-duplication identity across reconciliation passes
    pub operation_group_hash: String,
    /// Ledger timestamp in milliseconds since epoch
    pub timestamp: i64,
    pub block_level: i64,
    /// Signed smallest-unit amount; negative for burns
    pub amount: i64,
    pub fee: i64,
    pub source: String,
    pub destination: String,
    pub status: TransactionStatus,
    /// None for plain transfers
    pub entry_point: Option<EntryPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_operation_deserializes_without_parameters() {
        let row = serde_json::json!({
            "timestamp": 1_584_000_000_000_i64,
            "block_level": 850_000,
            "source": "tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "destination": "KT1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
            "kind": "transaction",
            "status": "applied",
            "operation_group_hash": "opAbc123"
        });

        let op: RawOperation = serde_json::from_value(row).unwrap();
        assert_eq!(op.amount, 0);
        assert_eq!(op.fee, 0);
        assert!(op.parameters.is_none());
        assert_eq!(op.timestamp_utc().timestamp_millis(), 1_584_000_000_000);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Ready).unwrap(),
            "\"ready\""
        );
        assert_eq!(serde_json::to_string(&EntryPoint::Burn).unwrap(), "\"burn\"");
    }
}
