// Call-parameter classification for token contract operations.
//
// Decodes one raw operation's parameters into a semantic transfer, mint, or
// burn event. The contract encodes its entry points as a tagged sum type:
//
//   transfer: Left(Left(Left(Pair <from> (Pair <to> <amount>))))
//   mint:     Right(Right(Right(Left(Pair <to> <amount>))))
//   burn:     Right(Right(Right(Right(Pair <to> <amount>))))
//
// Shapes are tested in that fixed order; the first match wins. Records that
// match nothing, or that match but carry a malformed payload, are skipped
// with an explicit reason so callers can distinguish the cases. A malformed
// record never aborts the batch.

use crate::micheline::{self, Micheline};
use crate::types::{EntryPoint, RawOperation, TokenTransaction, TransactionStatus};

// =============================================================================
// CLASSIFICATION OUTCOME
// =============================================================================

/// Per-record classification result
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Recognized call, decoded into a token event
    Event(TokenTransaction),
    /// Record produced no event; the reason says why
    Skipped(SkipReason),
}

/// Why a record produced no classified event
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Row carried no call parameters at all
    MissingParameters,
    /// Parameters failed to parse as a nested-pair expression
    Unparseable(String),
    /// Parameters parsed but match none of the known entry point shapes
    UnknownShape,
    /// A known shape matched but a field inside it was malformed
    InvalidPayload(String),
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MissingParameters => "missing-parameters",
            SkipReason::Unparseable(_) => "unparseable",
            SkipReason::UnknownShape => "unknown-shape",
            SkipReason::InvalidPayload(_) => "invalid-payload",
        }
    }
}

// Decoded call before the raw operation's metadata is folded in
enum TokenCall {
    Transfer {
        source: String,
        destination: String,
        amount: i64,
    },
    Mint {
        destination: String,
        amount: i64,
    },
    Burn {
        destination: String,
        amount: i64,
    },
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classify one raw operation against the token contract's entry points.
///
/// `manager_address` is substituted as the counter-party for mint and burn
/// events, which only name the affected holder in their payload.
pub fn classify_operation(op: &RawOperation, manager_address: &str) -> Classification {
    let params = match op.parameters.as_deref() {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Classification::Skipped(SkipReason::MissingParameters),
    };

    let tree = match micheline::parse(params) {
        Ok(tree) => tree,
        Err(e) => return Classification::Skipped(SkipReason::Unparseable(e.to_string())),
    };

    let call = match match_call(&tree) {
        Some(call) => call,
        None => return Classification::Skipped(SkipReason::UnknownShape),
    };

    match build_transaction(op, manager_address, call) {
        Ok(tx) => Classification::Event(tx),
        Err(why) => Classification::Skipped(SkipReason::InvalidPayload(why)),
    }
}

// Match the parsed tree against the three entry point shapes, in priority
// order. Returns None when no shape fits.
fn match_call(tree: &Micheline) -> Option<TokenCall> {
    use Micheline::{Int, Left, Pair, Right, Str};

    // transfer: Left(Left(Left(Pair from (Pair to amount))))
    if let Left(a) = tree {
        if let Left(b) = a.as_ref() {
            if let Left(c) = b.as_ref() {
                if let Pair(from, rest) = c.as_ref() {
                    if let (Str(from), Pair(to, amount)) = (from.as_ref(), rest.as_ref()) {
                        if let (Str(to), Int(amount)) = (to.as_ref(), amount.as_ref()) {
                            return Some(TokenCall::Transfer {
                                source: from.clone(),
                                destination: to.clone(),
                                amount: *amount,
                            });
                        }
                    }
                }
            }
        }
        return None;
    }

    // mint / burn: Right(Right(Right(Left|Right(Pair to amount))))
    if let Right(a) = tree {
        if let Right(b) = a.as_ref() {
            if let Right(c) = b.as_ref() {
                let (inner, is_mint) = match c.as_ref() {
                    Left(inner) => (inner, true),
                    Right(inner) => (inner, false),
                    _ => return None,
                };
                if let Pair(to, amount) = inner.as_ref() {
                    if let (Str(to), Int(amount)) = (to.as_ref(), amount.as_ref()) {
                        return Some(if is_mint {
                            TokenCall::Mint {
                                destination: to.clone(),
                                amount: *amount,
                            }
                        } else {
                            TokenCall::Burn {
                                destination: to.clone(),
                                amount: *amount,
                            }
                        });
                    }
                }
            }
        }
    }

    None
}

// Fold the decoded call together with the raw operation's metadata
fn build_transaction(
    op: &RawOperation,
    manager_address: &str,
    call: TokenCall,
) -> Result<TokenTransaction, String> {
    // Secondary check beyond the query-level status filter: a row that is
    // present but not applied yields a Failed event, not a dropped one.
    let status = if op.status == "applied" {
        TransactionStatus::Ready
    } else {
        TransactionStatus::Failed
    };

    let (source, destination, amount, entry_point) = match call {
        TokenCall::Transfer {
            source,
            destination,
            amount,
        } => (source, destination, amount, None),
        TokenCall::Mint {
            destination,
            amount,
        } => (
            manager_address.to_string(),
            destination,
            amount,
            Some(EntryPoint::Mint),
        ),
        TokenCall::Burn {
            destination,
            amount,
        } => (
            manager_address.to_string(),
            destination,
            -amount,
            Some(EntryPoint::Burn),
        ),
    };

    validate_address(&source)?;
    validate_address(&destination)?;

    Ok(TokenTransaction {
        operation_group_hash: op.operation_group_hash.clone(),
        timestamp: op.timestamp,
        block_level: op.block_level,
        amount,
        fee: op.fee,
        source,
        destination,
        status,
        entry_point,
    })
}

// Chain addresses are exactly 36 base58 characters
fn validate_address(address: &str) -> Result<(), String> {
    if address.len() != 36 {
        return Err(format!(
            "address '{}' has length {}, expected 36",
            address,
            address.len()
        ));
    }
    if !address.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(format!("address '{}' contains invalid characters", address));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANAGER: &str = "tz1ManagerManagerManagerManagerManag";
    const SOURCE: &str = "tz1SourceSourceSourceSourceSourceSou";
    const DEST: &str = "tz1DestDestDestDestDestDestDestDestD";

    fn raw_op(parameters: Option<&str>, status: &str) -> RawOperation {
        RawOperation {
            timestamp: 1_584_000_000_000,
            block_level: 850_000,
            source: SOURCE.to_string(),
            destination: "KT1TokenTokenTokenTokenTokenTokenTok".to_string(),
            amount: 0,
            kind: "transaction".to_string(),
            fee: 1_420,
            status: status.to_string(),
            operation_group_hash: "opGroupHash1".to_string(),
            parameters: parameters.map(str::to_string),
        }
    }

    #[test]
    fn classifies_transfer() {
        let params = format!(
            "Left(Left(Left(Pair\"{}\"(Pair\"{}\"500000))))",
            SOURCE, DEST
        );
        let op = raw_op(Some(&params), "applied");

        match classify_operation(&op, MANAGER) {
            Classification::Event(tx) => {
                assert_eq!(tx.status, TransactionStatus::Ready);
                assert_eq!(tx.amount, 500_000);
                assert_eq!(tx.source, SOURCE);
                assert_eq!(tx.destination, DEST);
                assert_eq!(tx.entry_point, None);
                assert_eq!(tx.operation_group_hash, "opGroupHash1");
            }
            other => panic!("expected transfer event, got {:?}", other),
        }
    }

    #[test]
    fn classifies_mint_with_manager_as_source() {
        let params = format!("Right(Right(Right(Left(Pair\"{}\"300000))))", DEST);
        let op = raw_op(Some(&params), "applied");

        match classify_operation(&op, MANAGER) {
            Classification::Event(tx) => {
                assert_eq!(tx.status, TransactionStatus::Ready);
                assert_eq!(tx.amount, 300_000);
                assert_eq!(tx.source, MANAGER);
                assert_eq!(tx.destination, DEST);
                assert_eq!(tx.entry_point, Some(EntryPoint::Mint));
            }
            other => panic!("expected mint event, got {:?}", other),
        }
    }

    #[test]
    fn classifies_burn_with_negated_amount() {
        let params = format!("Right(Right(Right(Right(Pair\"{}\"300000))))", DEST);
        let op = raw_op(Some(&params), "applied");

        match classify_operation(&op, MANAGER) {
            Classification::Event(tx) => {
                assert_eq!(tx.amount, -300_000);
                assert_eq!(tx.source, MANAGER);
                assert_eq!(tx.destination, DEST);
                assert_eq!(tx.entry_point, Some(EntryPoint::Burn));
            }
            other => panic!("expected burn event, got {:?}", other),
        }
    }

    #[test]
    fn unmatched_shape_is_skipped_with_reason() {
        let op = raw_op(Some("Pair \"abc\" 1"), "applied");
        assert_eq!(
            classify_operation(&op, MANAGER),
            Classification::Skipped(SkipReason::UnknownShape)
        );
    }

    #[test]
    fn unparseable_parameters_are_skipped_with_reason() {
        let op = raw_op(Some("SomeOtherShape(1)"), "applied");
        assert!(matches!(
            classify_operation(&op, MANAGER),
            Classification::Skipped(SkipReason::Unparseable(_))
        ));
    }

    #[test]
    fn missing_parameters_are_skipped() {
        let op = raw_op(None, "applied");
        assert_eq!(
            classify_operation(&op, MANAGER),
            Classification::Skipped(SkipReason::MissingParameters)
        );
    }

    #[test]
    fn non_applied_status_yields_failed_event() {
        let params = format!(
            "Left(Left(Left(Pair\"{}\"(Pair\"{}\"500000))))",
            SOURCE, DEST
        );
        let op = raw_op(Some(&params), "backtracked");

        match classify_operation(&op, MANAGER) {
            Classification::Event(tx) => assert_eq!(tx.status, TransactionStatus::Failed),
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn short_address_is_invalid_payload() {
        let op = raw_op(
            Some("Left(Left(Left(Pair\"tooShort\"(Pair\"alsoShort\"5))))"),
            "applied",
        );
        assert!(matches!(
            classify_operation(&op, MANAGER),
            Classification::Skipped(SkipReason::InvalidPayload(_))
        ));
    }

    #[test]
    fn transfer_shape_takes_priority_over_other_interpretations() {
        // Left-tagged trees never fall through to the mint/burn matcher
        let op = raw_op(Some("Left(Right(Right(Pair\"x\"1)))"), "applied");
        assert_eq!(
            classify_operation(&op, MANAGER),
            Classification::Skipped(SkipReason::UnknownShape)
        );
    }
}
