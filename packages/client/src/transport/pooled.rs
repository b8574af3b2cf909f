//! Pooled HTTP/1.1 + HTTP/2 transport on hyper-util's legacy client

use std::fmt;
use std::sync::{Arc, LazyLock};

use futures::future::BoxFuture;
use http::{Request, Response};
use http_body_util::BodyExt;
use hyper_rustls::{FixedServerNameResolver, HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};

use super::{Body, Transport};
use crate::config::{TransportConfig, Validator};
use crate::error::BoxError;
use crate::tls::{self, TlsClientConfig, TlsClientOptions, TlsError};

static DEFAULT_TRANSPORT: LazyLock<Arc<dyn Transport>> = LazyLock::new(|| {
    let transport = match HyperTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            tracing::warn!("default TLS configuration failed: {e}; falling back to bundled roots");
            HyperTransport::with_webpki_roots(&TransportConfig::default())
        }
    };
    Arc::new(transport)
});

/// Process-wide transport shared by runtimes that are not given one.
#[must_use]
pub fn default_transport() -> Arc<dyn Transport> {
    Arc::clone(&DEFAULT_TRANSPORT)
}

/// Transport backed by a pooled hyper client with rustls.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl HyperTransport {
    /// Transport with the platform trust store and default settings.
    ///
    /// # Errors
    ///
    /// Fails when the default TLS configuration cannot be built.
    pub fn new() -> Result<Self, TlsError> {
        let tls = tls::tls_client_auth(&TlsClientOptions::default())?;
        Self::with_tls(&tls, &TransportConfig::default())
    }

    /// Transport presenting the identity and trust roots in `tls`.
    ///
    /// # Errors
    ///
    /// Fails when `config` does not validate.
    pub fn with_tls(tls: &TlsClientConfig, config: &TransportConfig) -> Result<Self, TlsError> {
        config
            .validate()
            .map_err(|e| TlsError::Config(e.to_string()))?;

        let mut client_config = (*tls.client_config).clone();
        client_config.alpn_protocols.clear();

        let builder = HttpsConnectorBuilder::new()
            .with_tls_config(client_config)
            .https_or_http();
        let builder = match &tls.server_name {
            Some(name) => builder.with_server_name_resolver(FixedServerNameResolver::new(name.clone())),
            None => builder,
        };

        let connector = if config.http2 {
            builder
                .enable_http1()
                .enable_http2()
                .wrap_connector(http_connector(config))
        } else {
            builder.enable_http1().wrap_connector(http_connector(config))
        };

        Ok(Self::from_connector(connector, config))
    }

    fn with_webpki_roots(config: &TransportConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http_connector(config));
        Self::from_connector(connector, config)
    }

    fn from_connector(connector: HttpsConnector<HttpConnector>, config: &TransportConfig) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build(connector);
        Self { client }
    }
}

fn http_connector(config: &TransportConfig) -> HttpConnector {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(config.nodelay);
    http.set_connect_timeout(Some(config.connect_timeout));
    http
}

impl Transport for HyperTransport {
    fn round_trip(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, BoxError>> {
        Box::pin(async move {
            let response = self.client.request(request).await?;
            Ok(response.map(|body| body.map_err(BoxError::from).boxed()))
        })
    }
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn builds_with_fixed_server_name() {
        let tls = tls::tls_client_auth(&TlsClientOptions::new().with_server_name("internal.example")).unwrap();
        assert!(HyperTransport::with_tls(&tls, &TransportConfig::default()).is_ok());
    }

    #[test]
    fn invalid_transport_config_is_rejected() {
        let tls = tls::tls_client_auth(&TlsClientOptions::new().with_insecure_skip_verify(true)).unwrap();
        let config = TransportConfig::default().with_pool_idle_timeout(Duration::ZERO);
        assert!(matches!(
            HyperTransport::with_tls(&tls, &config),
            Err(TlsError::Config(_))
        ));
    }

    #[tokio::test]
    async fn refused_connection_surfaces_as_error() {
        let transport = HyperTransport::new().unwrap();
        let request = Request::get("http://127.0.0.1:1/")
            .body(crate::transport::empty())
            .unwrap();
        assert!(transport.round_trip(request).await.is_err());
    }
}
