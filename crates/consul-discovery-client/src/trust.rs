//! Trust-material resolution from the certificate store.

use crate::store::{CertificateStore, StoreCategory};
use consul_discovery_core::{DiscoveryError, Result};
use std::sync::Arc;
use tracing::debug;

/// Resolves an abstract certificate store path to trust-anchor bytes.
///
/// Nothing is cached: every call performs one store lookup and one byte
/// read, so a bundle replaced out-of-band is picked up by the next call.
/// Errors carry the name of the configuration field the path came from, so
/// operators can trace a failure back to a specific setting.
pub struct TrustMaterialResolver {
    store: Arc<dyn CertificateStore>,
    field: &'static str,
}

impl TrustMaterialResolver {
    /// Create a resolver reading from `store` on behalf of the named
    /// configuration field
    pub fn new(store: Arc<dyn CertificateStore>, field: &'static str) -> Self {
        Self { store, field }
    }

    /// Resolve a `/<partition>/<name>` store path to certificate bytes
    pub async fn resolve(&self, path: &str) -> Result<Vec<u8>> {
        let (partition, name) =
            split_store_path(path).ok_or_else(|| DiscoveryError::InvalidTrustPath {
                field: self.field,
                path: path.to_string(),
            })?;

        let located = self
            .store
            .lookup(partition, StoreCategory::Certificate, name)
            .await
            .map_err(|e| DiscoveryError::TrustMaterialRead {
                field: self.field,
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let Some(artifact) = located else {
            return Err(DiscoveryError::TrustMaterialNotFound {
                field: self.field,
                path: path.to_string(),
            });
        };

        debug!(path, artifact = %artifact.display(), "reading trust material");
        tokio::fs::read(&artifact)
            .await
            .map_err(|e| DiscoveryError::TrustMaterialRead {
                field: self.field,
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Split an absolute `/<partition>/<name>` path into its two segments.
fn split_store_path(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix('/')?;
    let (partition, name) = rest.split_once('/')?;
    if partition.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((partition, name))
}
