//! Fetch and print the member nodes of a Consul catalog.
//!
//! Run with: cargo run --example catalog_nodes
//!
//! Set the CONSUL_CATALOG_URI environment variable before running, e.g.
//! http://127.0.0.1:8500/v1/catalog/nodes. Optional:
//!
//! - CONSUL_SECRET: base64 encoded token
//! - CERT_STORE_ROOT + CONSUL_CA_BUNDLE: certificate store root directory
//!   and the `/<partition>/<name>` path of a trust bundle inside it

use consul_discovery_client::{
    ConsulProvider, FetchOptions, FsCertificateStore, NodeDiscoveryProvider, ProviderOptions,
    Result,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let uri = std::env::var("CONSUL_CATALOG_URI")
        .expect("CONSUL_CATALOG_URI environment variable is required");

    let mut options = ProviderOptions::new();
    if let Ok(secret) = std::env::var("CONSUL_SECRET") {
        options = options.secret(secret);
    }
    if let Ok(bundle) = std::env::var("CONSUL_CA_BUNDLE") {
        options = options.ca_bundle(bundle);
    }

    let mut builder = ConsulProvider::builder();
    if let Ok(root) = std::env::var("CERT_STORE_ROOT") {
        builder = builder.store(Arc::new(FsCertificateStore::new(root)));
    }

    let mut provider = builder.build();
    provider.init(options).await?;

    println!("=== Catalog Nodes ===");
    let nodes = provider.fetch_nodes(&uri, FetchOptions::new()).await?;
    for node in &nodes {
        println!("{} ({})", node.id, node.ip.private);
    }
    println!("{} nodes total", nodes.len());

    Ok(())
}
