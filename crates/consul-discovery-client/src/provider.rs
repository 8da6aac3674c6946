//! Consul node-discovery provider.

use crate::config::FetchConfig;
use crate::fetch::{HttpNodeFetcher, NodeFetcher};
use crate::store::CertificateStore;
use crate::trust::TrustMaterialResolver;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use consul_discovery_core::{
    DiscoveryError, FetchOptions, Node, PropertyMapping, ProviderOptions, RawNode, RequestOptions,
    Result,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Consul's bearer-style auth header
const TOKEN_HEADER: &str = "X-Consul-Token";

/// Configuration field named in trust-material error messages
const CA_BUNDLE_FIELD: &str = "caBundle";

/// A provider that can list cluster member nodes from a URI
#[async_trait]
pub trait NodeDiscoveryProvider {
    /// Initialize the provider with its options
    async fn init(&mut self, options: ProviderOptions) -> Result<()>;

    /// Fetch the nodes listed at `uri`, normalized to [`Node`] records
    async fn fetch_nodes(&self, uri: &str, options: FetchOptions) -> Result<Vec<Node>>;
}

/// Consul node-discovery provider.
///
/// Fetches cluster member nodes from a Consul catalog URI, authenticating
/// with the token decoded from the configured secret and optionally pinning
/// a trust bundle resolved from the certificate store.
pub struct ConsulProvider {
    fetcher: Box<dyn NodeFetcher>,
    resolver: Option<TrustMaterialResolver>,
    token: Option<String>,
    ca_bundle: Option<String>,
    verify_server_certificate: bool,
}

impl ConsulProvider {
    /// Create a provider reading trust material from `store`, with the
    /// default HTTP fetcher
    #[must_use]
    pub fn new(store: Arc<dyn CertificateStore>) -> Self {
        Self::builder().store(store).build()
    }

    /// Create a builder for custom collaborators
    #[must_use]
    pub fn builder() -> ConsulProviderBuilder {
        ConsulProviderBuilder::new()
    }

    fn trust_resolver(&self) -> Result<&TrustMaterialResolver> {
        self.resolver.as_ref().ok_or_else(|| {
            DiscoveryError::Config(format!(
                "{CA_BUNDLE_FIELD}: no certificate store configured"
            ))
        })
    }
}

#[async_trait]
impl NodeDiscoveryProvider for ConsulProvider {
    async fn init(&mut self, options: ProviderOptions) -> Result<()> {
        if let Some(secret) = &options.secret {
            self.token = Some(decode_secret(secret)?);
        }
        self.verify_server_certificate = options.verify_server_certificate;
        self.ca_bundle = options.ca_bundle;

        if let Some(path) = &self.ca_bundle {
            // Fail fast on a bad bundle. The bytes are discarded: the store
            // is the source of truth and is re-read on every fetch.
            self.trust_resolver()?.resolve(path).await?;
        }

        self.fetcher.init(catalog_mapping()).await
    }

    /// Fetch and normalize the nodes listed at `uri`.
    ///
    /// The configured token is inserted after caller headers are copied, so
    /// a caller-supplied `X-Consul-Token` value is replaced by it.
    async fn fetch_nodes(&self, uri: &str, options: FetchOptions) -> Result<Vec<Node>> {
        let mut request = RequestOptions {
            headers: options.headers,
            trust_anchor: None,
            verify_server_certificate: self.verify_server_certificate,
        };

        if let Some(token) = &self.token {
            request
                .headers
                .insert(TOKEN_HEADER.to_string(), token.clone());
        }

        if let Some(path) = &self.ca_bundle {
            request.trust_anchor = Some(self.trust_resolver()?.resolve(path).await?);
        }

        debug!(uri = %uri, "fetching catalog nodes");
        let raw = self.fetcher.fetch_nodes(uri, request).await?;
        raw.into_iter().map(normalize).collect()
    }
}

/// Builder for configuring a [`ConsulProvider`]
pub struct ConsulProviderBuilder {
    fetcher: Option<Box<dyn NodeFetcher>>,
    store: Option<Arc<dyn CertificateStore>>,
    fetch_config: FetchConfig,
}

impl ConsulProviderBuilder {
    fn new() -> Self {
        Self {
            fetcher: None,
            store: None,
            fetch_config: FetchConfig::default(),
        }
    }

    /// Set the node fetcher
    #[must_use]
    pub fn fetcher(mut self, fetcher: impl NodeFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Set the certificate store trust bundles are resolved from
    #[must_use]
    pub fn store(mut self, store: Arc<dyn CertificateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the configuration for the default HTTP fetcher
    #[must_use]
    pub fn fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch_config = config;
        self
    }

    /// Build the provider
    #[must_use]
    pub fn build(self) -> ConsulProvider {
        let Self {
            fetcher,
            store,
            fetch_config,
        } = self;
        ConsulProvider {
            fetcher: fetcher
                .unwrap_or_else(|| Box::new(HttpNodeFetcher::with_config(fetch_config))),
            resolver: store.map(|s| TrustMaterialResolver::new(s, CA_BUNDLE_FIELD)),
            token: None,
            ca_bundle: None,
            verify_server_certificate: true,
        }
    }
}

impl Default for ConsulProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Field mapping for a Consul catalog listing.
///
/// The identity is the whole record, which carries both the `ID` and `Node`
/// candidate fields; Consul reports a single `Address` for both IP roles.
fn catalog_mapping() -> PropertyMapping {
    PropertyMapping {
        id: String::new(),
        public_ip: "Address".to_string(),
        private_ip: "Address".to_string(),
    }
}

/// Decode the base64 provider secret into the token string
fn decode_secret(secret: &str) -> Result<String> {
    let bytes = B64
        .decode(secret)
        .map_err(|e| DiscoveryError::Config(format!("secret: invalid base64 credential: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| DiscoveryError::Config(format!("secret: credential is not valid UTF-8: {e}")))
}

/// Candidate identity fields of a Consul catalog record
#[derive(Deserialize)]
struct CatalogIdentity {
    #[serde(rename = "ID")]
    id: Option<String>,

    #[serde(rename = "Node")]
    node: Option<String>,
}

/// Normalize one raw record: `ID` wins when non-empty, `Node` is the
/// fallback; addresses pass through unchanged
fn normalize(raw: RawNode) -> Result<Node> {
    let identity: CatalogIdentity = serde_json::from_value(raw.id)?;
    let id = identity
        .id
        .filter(|v| !v.is_empty())
        .or_else(|| identity.node.filter(|v| !v.is_empty()))
        .unwrap_or_default();
    Ok(Node { id, ip: raw.ip })
}
