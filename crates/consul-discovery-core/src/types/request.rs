use std::collections::HashMap;

/// Caller-facing options for a single node fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Headers to add to the request
    pub headers: HashMap<String, String>,
}

impl FetchOptions {
    /// Create empty fetch options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header to the request
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The augmented request handed to the node fetcher.
///
/// Built fresh for every fetch; never persisted across calls.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Outgoing headers
    pub headers: HashMap<String, String>,

    /// PEM bytes of an additional trust anchor for server verification
    pub trust_anchor: Option<Vec<u8>>,

    /// Whether to verify the server certificate chain
    pub verify_server_certificate: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            trust_anchor: None,
            verify_server_certificate: true,
        }
    }
}

/// Property paths used to extract node fields from backend records.
///
/// Paths are dot-separated member accessors into each JSON record. The empty
/// path selects the whole record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    /// Path to the node identity value
    pub id: String,

    /// Path to the public IP address
    pub public_ip: String,

    /// Path to the private IP address
    pub private_ip: String,
}
