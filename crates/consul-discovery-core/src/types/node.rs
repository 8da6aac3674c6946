use serde::{Deserialize, Serialize};

/// Public and private addresses of a discovered node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddresses {
    /// Public IP address
    pub public: String,

    /// Private IP address
    pub private: String,
}

/// A discovered node with its identity normalized to a single ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable node identifier
    pub id: String,

    /// Node addresses
    pub ip: NodeAddresses,
}

/// A node as extracted from the backend response, before identity
/// normalization.
///
/// `id` carries whatever JSON value the configured id property path selected.
/// For a Consul catalog listing that is the whole record, an object holding
/// the `ID` and `Node` candidate fields.
#[derive(Debug, Clone)]
pub struct RawNode {
    /// Raw identity value selected by the id property path
    pub id: serde_json::Value,

    /// Node addresses
    pub ip: NodeAddresses,
}
