//! Inputs for building a client TLS identity

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use super::TlsError;

/// Lowest protocol version a client will negotiate.
///
/// rustls only speaks TLS 1.2 and 1.3, so the two older settings behave like
/// `Tls12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl FromStr for TlsVersion {
    type Err = TlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_prefix("TLS")
            .or_else(|| trimmed.strip_prefix("tls"))
            .unwrap_or(trimmed)
            .trim_start_matches(['v', ' ']);
        match number {
            "1.0" | "10" => Ok(Self::Tls10),
            "1.1" | "11" => Ok(Self::Tls11),
            "1.2" | "12" => Ok(Self::Tls12),
            "1.3" | "13" => Ok(Self::Tls13),
            _ => Err(TlsError::InvalidMinVersion(s.to_owned())),
        }
    }
}

/// Certificate, key and trust-root material for a TLS client.
///
/// A certificate path takes precedence over a loaded certificate. A loaded CA
/// takes precedence over a CA path. Setting `server_name` turns verification
/// back on even when `insecure_skip_verify` is set.
#[derive(Default)]
pub struct TlsClientOptions {
    /// PEM file holding the client certificate chain.
    pub certificate: Option<PathBuf>,
    /// PEM file holding the client private key.
    pub key: Option<PathBuf>,
    pub loaded_certificate: Option<CertificateDer<'static>>,
    /// RSA or ECDSA key matching `loaded_certificate`.
    pub loaded_key: Option<PrivateKeyDer<'static>>,
    /// PEM bundle of trust roots.
    pub ca: Option<PathBuf>,
    pub loaded_ca: Option<CertificateDer<'static>>,
    pub server_name: Option<String>,
    pub insecure_skip_verify: bool,
    pub min_version: Option<TlsVersion>,
}

impl Clone for TlsClientOptions {
    fn clone(&self) -> Self {
        Self {
            certificate: self.certificate.clone(),
            key: self.key.clone(),
            loaded_certificate: self.loaded_certificate.clone(),
            loaded_key: self.loaded_key.as_ref().map(PrivateKeyDer::clone_key),
            ca: self.ca.clone(),
            loaded_ca: self.loaded_ca.clone(),
            server_name: self.server_name.clone(),
            insecure_skip_verify: self.insecure_skip_verify,
            min_version: self.min_version,
        }
    }
}

impl TlsClientOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_certificate_files(mut self, certificate: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.certificate = Some(certificate.into());
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_loaded_certificate(
        mut self,
        certificate: CertificateDer<'static>,
        key: PrivateKeyDer<'static>,
    ) -> Self {
        self.loaded_certificate = Some(certificate);
        self.loaded_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_ca_file(mut self, ca: impl Into<PathBuf>) -> Self {
        self.ca = Some(ca.into());
        self
    }

    #[must_use]
    pub fn with_loaded_ca(mut self, ca: CertificateDer<'static>) -> Self {
        self.loaded_ca = Some(ca);
        self
    }

    #[must_use]
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    #[must_use]
    pub fn with_min_version(mut self, version: TlsVersion) -> Self {
        self.min_version = Some(version);
        self
    }

    /// Path-form certificate, ignoring empty paths.
    pub(crate) fn certificate_path(&self) -> Option<&PathBuf> {
        self.certificate.as_ref().filter(|p| !p.as_os_str().is_empty())
    }

    pub(crate) fn ca_path(&self) -> Option<&PathBuf> {
        self.ca.as_ref().filter(|p| !p.as_os_str().is_empty())
    }

    pub(crate) fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref().filter(|s| !s.is_empty())
    }
}

impl fmt::Debug for TlsClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsClientOptions")
            .field("certificate", &self.certificate)
            .field("key", &self.key)
            .field("loaded_certificate", &self.loaded_certificate.is_some())
            .field("loaded_key", &self.loaded_key.as_ref().map(|_| "[redacted]"))
            .field("ca", &self.ca)
            .field("loaded_ca", &self.loaded_ca.is_some())
            .field("server_name", &self.server_name)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("min_version", &self.min_version)
            .finish()
    }
}
