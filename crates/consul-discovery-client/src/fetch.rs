//! Generic node fetching over HTTP.

use crate::config::FetchConfig;
use async_trait::async_trait;
use consul_discovery_core::{
    DiscoveryError, NodeAddresses, PropertyMapping, RawNode, RequestOptions, Result,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Fetches raw node records from a URI.
///
/// Configured once with the property mapping that locates node fields in
/// the backend's records; each fetch then applies the per-request headers
/// and TLS options it is handed.
#[async_trait]
pub trait NodeFetcher: Send + Sync {
    /// Configure the field mapping applied to fetched records
    async fn init(&mut self, mapping: PropertyMapping) -> Result<()>;

    /// Fetch the resource at `uri` and extract one raw record per node
    async fn fetch_nodes(&self, uri: &str, options: RequestOptions) -> Result<Vec<RawNode>>;
}

/// HTTP node fetcher.
///
/// Fetches a JSON array of objects from the URI and extracts node fields
/// per the configured mapping. Bodies that are JSON strings which
/// themselves parse to an array are also supported.
pub struct HttpNodeFetcher {
    config: FetchConfig,
    mapping: Option<PropertyMapping>,
}

impl HttpNodeFetcher {
    /// Create a fetcher with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher with the given configuration
    #[must_use]
    pub fn with_config(config: FetchConfig) -> Self {
        Self {
            config,
            mapping: None,
        }
    }

    /// Build the HTTP client for one request.
    ///
    /// The client is built per call because the trust anchor may differ
    /// between calls.
    fn build_client(&self, options: &RequestOptions) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .gzip(true);

        if let Some(anchor) = &options.trust_anchor {
            for cert in parse_trust_anchor(anchor)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        if !options.verify_server_certificate {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| DiscoveryError::Http(e.to_string()))
    }
}

impl Default for HttpNodeFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeFetcher for HttpNodeFetcher {
    async fn init(&mut self, mapping: PropertyMapping) -> Result<()> {
        debug!(?mapping, "node fetcher configured");
        self.mapping = Some(mapping);
        Ok(())
    }

    async fn fetch_nodes(&self, uri: &str, options: RequestOptions) -> Result<Vec<RawNode>> {
        let mapping = self
            .mapping
            .as_ref()
            .ok_or_else(|| DiscoveryError::Config("node fetcher used before init".to_string()))?;

        let client = self.build_client(&options)?;
        let headers = build_headers(&options.headers)?;

        debug!(uri = %uri, "GET node listing");
        let response = client
            .get(uri)
            .headers(headers)
            .send()
            .await
            .map_err(|e| DiscoveryError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Http(e.to_string()))?;

        if !status.is_success() {
            warn!(uri = %uri, code = status.as_u16(), "node listing rejected");
            return Err(DiscoveryError::Api {
                code: status.as_u16(),
                message: body,
            });
        }

        let records = parse_node_records(&body)?;
        Ok(extract_nodes(&records, mapping))
    }
}

/// Parse PEM trust-anchor bytes into certificates
fn parse_trust_anchor(pem_bytes: &[u8]) -> Result<Vec<reqwest::Certificate>> {
    let blocks = pem::parse_many(pem_bytes)
        .map_err(|e| DiscoveryError::Config(format!("trust anchor is not valid PEM: {e}")))?;

    let mut certs = Vec::new();
    for block in &blocks {
        if block.tag() != "CERTIFICATE" {
            continue;
        }
        let cert = reqwest::Certificate::from_der(block.contents())
            .map_err(|e| DiscoveryError::Config(format!("trust anchor certificate rejected: {e}")))?;
        certs.push(cert);
    }

    if certs.is_empty() {
        return Err(DiscoveryError::Config(
            "trust anchor contains no certificates".to_string(),
        ));
    }
    Ok(certs)
}

/// Convert the string header map into typed request headers
fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DiscoveryError::Config(format!("invalid header name {name}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| DiscoveryError::Config(format!("invalid value for header {name}: {e}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Parse the response body into an array of records.
///
/// A body that is a JSON string is parsed a second time, accepting
/// double-encoded arrays.
fn parse_node_records(body: &str) -> Result<Vec<serde_json::Value>> {
    let mut document: serde_json::Value = serde_json::from_str(body)?;
    if let serde_json::Value::String(inner) = &document {
        document = serde_json::from_str(inner)?;
    }
    match document {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(DiscoveryError::Config(
            "expected a JSON array of nodes".to_string(),
        )),
    }
}

/// Apply the property mapping to every record.
///
/// Records without usable addresses are skipped; the identity value is
/// carried raw for the caller to normalize.
fn extract_nodes(records: &[serde_json::Value], mapping: &PropertyMapping) -> Vec<RawNode> {
    let mut nodes = Vec::with_capacity(records.len());
    for record in records {
        let public = select(record, &mapping.public_ip).and_then(|v| v.as_str());
        let private = select(record, &mapping.private_ip).and_then(|v| v.as_str());
        let (Some(public), Some(private)) = (public, private) else {
            warn!("skipping node record without usable addresses");
            continue;
        };

        let id = select(record, &mapping.id)
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        nodes.push(RawNode {
            id,
            ip: NodeAddresses {
                public: public.to_string(),
                private: private.to_string(),
            },
        });
    }
    nodes
}

/// Select a value by dot-separated path; the empty path selects the record
fn select<'a>(record: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    if path.is_empty() {
        return Some(record);
    }
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog_mapping() -> PropertyMapping {
        PropertyMapping {
            id: String::new(),
            public_ip: "Address".to_string(),
            private_ip: "Address".to_string(),
        }
    }

    async fn ready_fetcher() -> HttpNodeFetcher {
        let mut fetcher = HttpNodeFetcher::new();
        fetcher.init(catalog_mapping()).await.unwrap();
        fetcher
    }

    #[test]
    fn test_select_paths() {
        let record = json!({ "a": { "b": "deep" }, "top": 1 });
        assert_eq!(select(&record, ""), Some(&record));
        assert_eq!(select(&record, "top"), Some(&json!(1)));
        assert_eq!(select(&record, "a.b"), Some(&json!("deep")));
        assert_eq!(select(&record, "a.missing"), None);
        assert_eq!(select(&record, "missing"), None);
    }

    #[tokio::test]
    async fn test_fetch_before_init_fails() {
        let fetcher = HttpNodeFetcher::new();
        let err = fetcher
            .fetch_nodes("http://127.0.0.1:1", RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }

    #[tokio::test]
    async fn test_fetch_extracts_catalog_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/catalog/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "ID": "c17d2be5-200a-4ff1-ab92-996f120f88cc",
                    "Node": "test-node-1",
                    "Address": "192.0.2.10",
                    "Datacenter": "dc1"
                },
                {
                    "ID": "",
                    "Node": "test-node-2",
                    "Address": "192.0.2.11"
                }
            ])))
            .mount(&server)
            .await;

        let fetcher = ready_fetcher().await;
        let nodes = fetcher
            .fetch_nodes(
                &format!("{}/v1/catalog/nodes", server.uri()),
                RequestOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].ip.public, "192.0.2.10");
        assert_eq!(nodes[0].ip.private, "192.0.2.10");
        assert_eq!(nodes[0].id["Node"], "test-node-1");
        assert_eq!(nodes[1].id["ID"], "");
    }

    #[tokio::test]
    async fn test_fetch_forwards_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("X-Consul-Token", "password12345"))
            .and(header("Foo", "Bar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut options = RequestOptions::default();
        options
            .headers
            .insert("X-Consul-Token".to_string(), "password12345".to_string());
        options.headers.insert("Foo".to_string(), "Bar".to_string());

        let fetcher = ready_fetcher().await;
        let nodes = fetcher.fetch_nodes(&server.uri(), options).await.unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("catalog down"))
            .mount(&server)
            .await;

        let fetcher = ready_fetcher().await;
        let err = fetcher
            .fetch_nodes(&server.uri(), RequestOptions::default())
            .await
            .unwrap_err();
        match err {
            DiscoveryError::Api { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "catalog down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_double_encoded_body_is_accepted() {
        let records = json!([{ "Node": "n1", "Address": "192.0.2.10" }]);
        let double_encoded = serde_json::to_string(&records.to_string()).unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(double_encoded))
            .mount(&server)
            .await;

        let fetcher = ready_fetcher().await;
        let nodes = fetcher
            .fetch_nodes(&server.uri(), RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].ip.private, "192.0.2.10");
    }

    #[tokio::test]
    async fn test_non_array_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": [] })))
            .mount(&server)
            .await;

        let fetcher = ready_fetcher().await;
        let err = fetcher
            .fetch_nodes(&server.uri(), RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }

    #[tokio::test]
    async fn test_records_without_addresses_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "Node": "n1", "Address": "192.0.2.10" },
                { "Node": "no-address" },
                { "Node": "bad-address", "Address": 42 }
            ])))
            .mount(&server)
            .await;

        let fetcher = ready_fetcher().await;
        let nodes = fetcher
            .fetch_nodes(&server.uri(), RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id["Node"], "n1");
    }

    #[test]
    fn test_trust_anchor_must_hold_certificates() {
        let err = parse_trust_anchor(b"not pem at all").unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }
}
