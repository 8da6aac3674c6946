use serde::{Deserialize, Serialize};

/// Provider options, consumed once at `init`.
///
/// Field names follow the camelCase option shape the provider receives from
/// its embedding process, so a JSON options blob deserializes directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderOptions {
    /// Base64 encoded Consul credentials, decoded to the token sent as
    /// `X-Consul-Token`
    pub secret: Option<String>,

    /// Absolute certificate store path (`/<partition>/<name>`) of a trust
    /// bundle to use as an additional TLS trust anchor
    pub ca_bundle: Option<String>,

    /// Whether to verify the server certificate chain on every request
    pub verify_server_certificate: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            secret: None,
            ca_bundle: None,
            verify_server_certificate: true,
        }
    }
}

impl ProviderOptions {
    /// Create options with all defaults (no token, no bundle, verify on)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base64 encoded credentials
    #[must_use]
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the trust bundle store path
    #[must_use]
    pub fn ca_bundle(mut self, path: impl Into<String>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    /// Set whether server certificates are verified
    #[must_use]
    pub const fn verify_server_certificate(mut self, verify: bool) -> Self {
        self.verify_server_certificate = verify;
        self
    }
}
