//! Local secure storage for TLS trust material.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Artifact categories a certificate store can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCategory {
    /// X.509 certificates and certificate bundles
    Certificate,

    /// Private keys
    Key,
}

impl StoreCategory {
    /// Directory name used for the category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::Key => "key",
        }
    }
}

/// Local secure storage holding artifacts addressable by partition,
/// category, and name.
///
/// Implementations own the enumeration mechanism entirely; callers only see
/// a readable path or absence.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Look up a stored artifact, returning its readable path, or `None`
    /// when the store holds nothing matching the name
    async fn lookup(
        &self,
        partition: &str,
        category: StoreCategory,
        name: &str,
    ) -> io::Result<Option<PathBuf>>;
}

/// Certificate store backed by a directory tree.
///
/// Artifacts live at `<root>/<partition>/<category>/<name>`. A lookup
/// prefers an entry whose file name equals the requested name; otherwise the
/// lexicographically first entry whose stem matches is returned, so
/// resolution is deterministic.
pub struct FsCertificateStore {
    root: PathBuf,
}

impl FsCertificateStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CertificateStore for FsCertificateStore {
    async fn lookup(
        &self,
        partition: &str,
        category: StoreCategory,
        name: &str,
    ) -> io::Result<Option<PathBuf>> {
        let dir = self.root.join(partition).join(category.as_str());
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "store partition directory not found");
            return Ok(None);
        }

        let mut stem_matches = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            if entry.file_name().to_str() == Some(name) {
                return Ok(Some(path));
            }
            if path.file_stem().and_then(|stem| stem.to_str()) == Some(name) {
                stem_matches.push(path);
            }
        }

        stem_matches.sort();
        Ok(stem_matches.into_iter().next())
    }
}
