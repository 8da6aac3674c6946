//! HTTP node-discovery provider for Consul catalogs.
//!
//! This crate provides the main [`ConsulProvider`] for listing cluster
//! member nodes from a Consul catalog URI, along with the collaborator
//! seams it is built on: the [`NodeFetcher`] that performs the HTTP
//! round trip and the [`CertificateStore`] that holds TLS trust material.

#![doc(html_root_url = "https://docs.rs/consul-discovery-client/0.1.0")]

mod config;
mod fetch;
mod provider;
mod store;
mod trust;

pub use config::FetchConfig;
pub use consul_discovery_core::{
    DiscoveryError, FetchOptions, Node, NodeAddresses, PropertyMapping, ProviderOptions, RawNode,
    RequestOptions, Result,
};
pub use fetch::{HttpNodeFetcher, NodeFetcher};
pub use provider::{ConsulProvider, ConsulProviderBuilder, NodeDiscoveryProvider};
pub use store::{CertificateStore, FsCertificateStore, StoreCategory};
pub use trust::TrustMaterialResolver;
