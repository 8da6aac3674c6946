//! Data types for provider configuration, requests, and node records.

mod node;
mod options;
mod request;

pub use node::{Node, NodeAddresses, RawNode};
pub use options::ProviderOptions;
pub use request::{FetchOptions, PropertyMapping, RequestOptions};
