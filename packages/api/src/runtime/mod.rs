//! Long-lived runtime state shared by every operation call
//!
//! Configure a `Runtime` with its `&mut self` setters before sharing it.
//! `submit` only reads runtime fields, so changing them while calls are in
//! flight needs outside synchronization.

use std::fmt;
use std::sync::{Arc, OnceLock};

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use oasrt_client::logger::{self, StandardLogger};
use oasrt_client::media::{self, Consumer, Consumers, Producer, Producers};
use oasrt_client::transport::{self, KeepAliveTransport, Transport};
use oasrt_client::{AuthInfo, Context, CookieStore, Formats, HttpClient, Logger};

mod submit;

/// Executes [`ClientOperation`](crate::ClientOperation)s against one host.
pub struct Runtime {
    default_media_type: String,
    default_authentication: Option<AuthInfo>,
    consumers: Consumers,
    producers: Producers,
    transport: Arc<dyn Transport>,
    jar: Option<Arc<dyn CookieStore>>,
    host: String,
    base_path: String,
    formats: Formats,
    context: Option<Context>,
    debug: bool,
    logger: Arc<dyn Logger>,
    schemes: Vec<String>,
    client: OnceLock<HttpClient>,
    #[cfg(test)]
    client_builds: AtomicUsize,
}

impl Runtime {
    /// Runtime for `host` with the default codecs and the shared transport.
    ///
    /// `base_path` gains a leading `/` when missing. The debug flag starts from
    /// the `SWAGGER_DEBUG` / `DEBUG` environment variables.
    pub fn new<I, S>(host: impl Into<String>, base_path: impl Into<String>, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut base_path = base_path.into();
        if !base_path.starts_with('/') {
            base_path.insert(0, '/');
        }

        Self {
            default_media_type: media::JSON_MIME.to_owned(),
            default_authentication: None,
            consumers: media::default_consumers(),
            producers: media::default_producers(),
            transport: transport::default_transport(),
            jar: None,
            host: host.into(),
            base_path,
            formats: Formats::default(),
            context: None,
            debug: logger::debug_enabled(),
            logger: Arc::new(StandardLogger),
            schemes: schemes.into_iter().map(Into::into).collect(),
            client: OnceLock::new(),
            #[cfg(test)]
            client_builds: AtomicUsize::new(0),
        }
    }

    /// Runtime that uses `client` instead of building its own.
    ///
    /// The runtime's transport and jar are then never consulted.
    pub fn with_client<I, S>(
        host: impl Into<String>,
        base_path: impl Into<String>,
        schemes: I,
        client: HttpClient,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let runtime = Self::new(host, base_path, schemes);
        let _ = runtime.client.set(client);
        runtime
    }

    /// The client used for operations without their own.
    ///
    /// Built from the runtime's transport and jar on first use, exactly once.
    pub fn client(&self) -> &HttpClient {
        self.client.get_or_init(|| {
            #[cfg(test)]
            self.client_builds.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(host = %self.host, "building runtime client");
            HttpClient::new(Arc::clone(&self.transport)).with_jar(self.jar.clone())
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    /// Replace the transport used to build the client.
    ///
    /// Has no effect on a client that is already built or was injected.
    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        if self.client.get().is_some() {
            tracing::warn!("transport changed after the runtime client was built; the client keeps its transport");
        }
        self.transport = transport;
    }

    /// Replace the cookie jar used to build the client.
    ///
    /// Has no effect on a client that is already built or was injected.
    pub fn set_jar(&mut self, jar: Option<Arc<dyn CookieStore>>) {
        if self.client.get().is_some() {
            tracing::warn!("cookie jar changed after the runtime client was built; the client keeps its jar");
        }
        self.jar = jar;
    }

    /// Drain unread response bodies so pooled connections are reused.
    ///
    /// Wraps the built client's transport when there is one, otherwise the
    /// transport the client will be built from. A server that never ends its
    /// response body keeps the drain running, so this is off by default.
    pub fn enable_connection_reuse(&mut self) {
        if let Some(client) = self.client.get_mut() {
            let inner = Arc::clone(client.transport());
            client.set_transport(Arc::new(KeepAliveTransport::new(inner)));
            return;
        }
        let inner = Arc::clone(&self.transport);
        self.transport = Arc::new(KeepAliveTransport::new(inner));
    }

    pub fn set_default_media_type(&mut self, media_type: impl Into<String>) {
        self.default_media_type = media_type.into();
    }

    pub fn set_default_authentication(&mut self, auth: Option<AuthInfo>) {
        self.default_authentication = auth;
    }

    /// Context used for operations that bring none.
    pub fn set_context(&mut self, context: Option<Context>) {
        self.context = context;
    }

    pub fn register_consumer(&mut self, media_type: impl Into<String>, consumer: Arc<dyn Consumer>) {
        self.consumers.insert(media_type.into(), consumer);
    }

    pub fn register_producer(&mut self, media_type: impl Into<String>, producer: Arc<dyn Producer>) {
        self.producers.insert(media_type.into(), producer);
    }

    /// Drop the consumer for `media_type`, returning it.
    pub fn remove_consumer(&mut self, media_type: &str) -> Option<Arc<dyn Consumer>> {
        self.consumers.remove(media_type)
    }

    pub fn remove_producer(&mut self, media_type: &str) -> Option<Arc<dyn Producer>> {
        self.producers.remove(media_type)
    }

    pub fn formats_mut(&mut self) -> &mut Formats {
        &mut self.formats
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut consumers: Vec<_> = self.consumers.keys().collect();
        consumers.sort();
        let mut producers: Vec<_> = self.producers.keys().collect();
        producers.sort();
        f.debug_struct("Runtime")
            .field("host", &self.host)
            .field("base_path", &self.base_path)
            .field("schemes", &self.schemes)
            .field("default_media_type", &self.default_media_type)
            .field("consumers", &consumers)
            .field("producers", &producers)
            .field("debug", &self.debug)
            .field("client_built", &self.client.get().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_gains_leading_slash() {
        let rt = Runtime::new("api.local", "v1", ["https"]);
        assert_eq!(rt.base_path(), "/v1");
        assert_eq!(Runtime::new("api.local", "/v2", ["http"]).base_path(), "/v2");
        assert_eq!(Runtime::new("api.local", "", Vec::<String>::new()).base_path(), "/");
    }

    #[test]
    fn injected_client_is_never_rebuilt() {
        let client = HttpClient::new(transport::default_transport());
        let rt = Runtime::with_client("api.local", "/", ["http"], client);
        let _ = rt.client();
        assert_eq!(rt.client_builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn connection_reuse_wraps_built_client() {
        let mut rt = Runtime::new("api.local", "/", ["http"]);
        let before = Arc::clone(rt.client().transport());
        rt.enable_connection_reuse();
        assert!(!Arc::ptr_eq(&before, rt.client().transport()));
        assert_eq!(rt.client_builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn connection_reuse_wraps_pending_transport() {
        let mut rt = Runtime::new("api.local", "/", ["http"]);
        let before = Arc::clone(&rt.transport);
        rt.enable_connection_reuse();
        assert!(!Arc::ptr_eq(&before, &rt.transport));
        assert!(rt.client.get().is_none());
    }
}
