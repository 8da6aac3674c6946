use thiserror::Error;

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that can occur while discovering nodes
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A configured certificate store path is malformed
    #[error("{field}: {path} is not a valid certificate store path")]
    InvalidTrustPath {
        /// Configuration field the path came from
        field: &'static str,
        /// The offending path
        path: String,
    },

    /// The certificate store has no artifact at the configured path
    #[error("{field}: no certificate found for {path}")]
    TrustMaterialNotFound {
        /// Configuration field the path came from
        field: &'static str,
        /// The path that was looked up
        path: String,
    },

    /// The store located the certificate but its bytes could not be read
    #[error("{field}: failed to read certificate {path}: {reason}")]
    TrustMaterialRead {
        /// Configuration field the path came from
        field: &'static str,
        /// The path that was looked up
        path: String,
        /// Original error text
        reason: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Backend returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Response body text
        message: String,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiscoveryError {
    /// Returns true if the error came from trust-material resolution
    #[must_use]
    pub const fn is_trust_material(&self) -> bool {
        matches!(
            self,
            Self::InvalidTrustPath { .. }
                | Self::TrustMaterialNotFound { .. }
                | Self::TrustMaterialRead { .. }
        )
    }

    /// Returns the HTTP status code if the backend rejected the request
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_errors_carry_field_prefix() {
        let err = DiscoveryError::TrustMaterialNotFound {
            field: "caBundle",
            path: "/Common/missing.crt".to_string(),
        };
        assert!(err.to_string().starts_with("caBundle: "));

        let err = DiscoveryError::TrustMaterialRead {
            field: "caBundle",
            path: "/Common/ca.crt".to_string(),
            reason: "permission denied".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("caBundle: "));
        assert!(text.ends_with("permission denied"));
    }

    #[test]
    fn test_is_trust_material() {
        let err = DiscoveryError::InvalidTrustPath {
            field: "caBundle",
            path: "relative/path".to_string(),
        };
        assert!(err.is_trust_material());
        assert!(!DiscoveryError::Http("boom".to_string()).is_trust_material());
    }

    #[test]
    fn test_status_code() {
        let err = DiscoveryError::Api {
            code: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(DiscoveryError::Config("bad".to_string()).status_code(), None);
    }
}
