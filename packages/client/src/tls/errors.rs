//! TLS identity construction errors

use std::path::PathBuf;

/// Failure while turning certificate, key and CA material into a client config.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("tls client cert: {0}")]
    CertLoad(String),
    #[error("tls client priv key: unsupported key type {0}")]
    UnsupportedKeyType(String),
    #[error("tls client ca: {path}: {source}")]
    CaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tls client ca: {0}")]
    InvalidCa(String),
    #[error("unsupported minimum TLS version: {0}")]
    InvalidMinVersion(String),
    #[error("invalid server name {0:?}")]
    InvalidServerName(String),
    #[error("tls configuration: {0}")]
    Config(String),
}
