// HTTP client for the chain query service.
//
// The service exposes indexed ledger data behind a POST endpoint per entity;
// operations live at /v2/data/{platform}/{network}/operations. Requests carry
// the API key as a header and the serialized query document as the body.
//
// The OperationSource trait is the seam between the reconciler and the
// network: tests substitute an in-memory source, and alternate indexer
// backends can slot in behind the same trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{SyncError, SyncResult};
use crate::logger::{self, LogTag};
use crate::query::OperationQuery;
use crate::types::{NodeConfig, RawOperation};

const DEFAULT_PLATFORM: &str = "tezos";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Anything that can answer a declarative operation query
#[async_trait]
pub trait OperationSource: Send + Sync {
    async fn fetch_operations(&self, query: &OperationQuery) -> SyncResult<Vec<RawOperation>>;
}

// =============================================================================
// QUERY SERVICE CLIENT
// =============================================================================

/// Client for one node's query service endpoint
pub struct ConseilClient {
    http: reqwest::Client,
    config: NodeConfig,
    platform: String,
}

impl ConseilClient {
    pub fn new(config: NodeConfig) -> SyncResult<Self> {
        if config.url.trim().is_empty() {
            return Err(SyncError::Config("query service url is empty".to_string()));
        }
        if config.network.trim().is_empty() {
            return Err(SyncError::Config("network name is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            config,
            platform: DEFAULT_PLATFORM.to_string(),
        })
    }

    /// Override the platform path segment (defaults to "tezos")
    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    fn operations_url(&self) -> String {
        format!(
            "{}/v2/data/{}/{}/operations",
            self.config.url.trim_end_matches('/'),
            self.platform,
            self.config.network
        )
    }
}

#[async_trait]
impl OperationSource for ConseilClient {
    async fn fetch_operations(&self, query: &OperationQuery) -> SyncResult<Vec<RawOperation>> {
        let url = self.operations_url();

        logger::debug(
            LogTag::Query,
            "FETCH",
            &format!(
                "POST {} ({} predicates, limit {})",
                url,
                query.predicates.len(),
                query.limit
            ),
        );

        let response = self
            .http
            .post(&url)
            .header("apiKey", &self.config.api_key)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<RawOperation> = response.json().await?;

        logger::debug(
            LogTag::Query,
            "FETCH",
            &format!("received {} operation rows", rows.len()),
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(url: &str, network: &str) -> NodeConfig {
        NodeConfig {
            url: url.to_string(),
            api_key: "key".to_string(),
            network: network.to_string(),
        }
    }

    #[test]
    fn builds_operations_url_from_node_config() {
        let client = ConseilClient::new(node("https://conseil.example.com", "mainnet")).unwrap();
        assert_eq!(
            client.operations_url(),
            "https://conseil.example.com/v2/data/tezos/mainnet/operations"
        );
    }

    #[test]
    fn strips_trailing_slash_and_honors_platform_override() {
        let client = ConseilClient::new(node("https://conseil.example.com/", "delphinet"))
            .unwrap()
            .with_platform("tezos-test");
        assert_eq!(
            client.operations_url(),
            "https://conseil.example.com/v2/data/tezos-test/delphinet/operations"
        );
    }

    #[test]
    fn rejects_empty_endpoint_configuration() {
        assert!(matches!(
            ConseilClient::new(node("", "mainnet")),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(
            ConseilClient::new(node("https://conseil.example.com", "  ")),
            Err(SyncError::Config(_))
        ));
    }
}
