// Declarative query descriptors for the chain query service.
//
// The service accepts a JSON document naming the projected fields, the
// filter predicates, an ordering, and a row cap. The builder here mirrors
// that wire shape one-to-one; construction is infallible and the descriptor
// is immutable once handed to the client.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROW_LIMIT: u32 = 100;

// =============================================================================
// WIRE SHAPE
// =============================================================================

/// Predicate operator understood by the query service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Like,
    In,
    Between,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub operation: Operator,
    pub set: Vec<serde_json::Value>,
    pub inverse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub field: String,
    pub direction: SortDirection,
}

/// One complete query document as the service expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationQuery {
    pub fields: Vec<String>,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<Ordering>,
    pub limit: u32,
    pub aggregation: Vec<serde_json::Value>,
}

impl Default for OperationQuery {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

impl OperationQuery {
    /// Blank query with the service's default row cap
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            predicates: Vec::new(),
            order_by: Vec::new(),
            limit: DEFAULT_ROW_LIMIT,
            aggregation: Vec::new(),
        }
    }

    /// Project the named fields, in order
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Add a non-inverted predicate over a single value
    pub fn with_predicate(mut self, field: &str, operation: Operator, value: &str) -> Self {
        self.predicates.push(Predicate {
            field: field.to_string(),
            operation,
            set: vec![serde_json::Value::String(value.to_string())],
            inverse: false,
        });
        self
    }

    /// Replace the ordering with a single sort key
    pub fn with_ordering(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by = vec![Ordering {
            field: field.to_string(),
            direction,
        }];
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_fields_and_predicates() {
        let query = OperationQuery::new()
            .with_fields(&["timestamp", "source"])
            .with_predicate("kind", Operator::Eq, "transaction")
            .with_predicate("status", Operator::Eq, "applied")
            .with_ordering("timestamp", SortDirection::Desc)
            .with_limit(1_000);

        assert_eq!(query.fields, vec!["timestamp", "source"]);
        assert_eq!(query.predicates.len(), 2);
        assert_eq!(query.predicates[0].operation, Operator::Eq);
        assert!(!query.predicates[0].inverse);
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.limit, 1_000);
    }

    #[test]
    fn serializes_to_service_wire_shape() {
        let query = OperationQuery::new()
            .with_fields(&["timestamp"])
            .with_predicate("parameters", Operator::Like, "tz1abc")
            .with_ordering("timestamp", SortDirection::Desc)
            .with_limit(1_000);

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": ["timestamp"],
                "predicates": [{
                    "field": "parameters",
                    "operation": "like",
                    "set": ["tz1abc"],
                    "inverse": false
                }],
                "orderBy": [{"field": "timestamp", "direction": "desc"}],
                "limit": 1000,
                "aggregation": []
            })
        );
    }
}
