//! Client TLS identities
//!
//! `tls_client_auth` turns certificate, key and CA material into a rustls
//! configuration. `tls_transport` and `tls_client` wrap that configuration in
//! a transport and a bare client respectively.

mod errors;
mod identity;
mod options;
mod verifier;

use std::sync::Arc;

pub use errors::TlsError;
pub use identity::{TlsClientConfig, tls_client_auth};
pub use options::{TlsClientOptions, TlsVersion};

use crate::client::HttpClient;
use crate::config::TransportConfig;
use crate::transport::HyperTransport;

/// Transport presenting the identity described by `opts`.
///
/// # Errors
///
/// Any error from [`tls_client_auth`].
pub fn tls_transport(opts: &TlsClientOptions) -> Result<HyperTransport, TlsError> {
    let tls = tls_client_auth(opts)?;
    HyperTransport::with_tls(&tls, &TransportConfig::default())
}

/// Bare client on top of [`tls_transport`].
///
/// # Errors
///
/// Any error from [`tls_client_auth`].
pub fn tls_client(opts: &TlsClientOptions) -> Result<HttpClient, TlsError> {
    Ok(HttpClient::new(Arc::new(tls_transport(opts)?)))
}
