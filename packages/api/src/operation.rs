//! Per-call operation descriptor

use std::fmt;
use std::sync::Arc;

use http::Method;
use oasrt_client::request::NoParams;
use oasrt_client::{AuthInfo, ClientRequestWriter, Context, HttpClient};

/// One callable API action, handed to [`Runtime::submit`](crate::Runtime::submit).
///
/// Everything optional falls back to the runtime: `auth_info` to its default
/// authentication, `context` to its default context, `client` to its lazily
/// built client. `schemes` only applies when the runtime has none.
pub struct ClientOperation<R> {
    pub id: String,
    pub method: Method,
    pub path_pattern: String,
    pub params: Arc<dyn ClientRequestWriter>,
    pub reader: R,
    /// Media types the server accepts for the request body, by preference.
    pub consumes_media_types: Vec<String>,
    /// Media types the client accepts in the response, sent as `Accept`.
    pub produces_media_types: Vec<String>,
    pub schemes: Vec<String>,
    pub auth_info: Option<AuthInfo>,
    /// A caller-supplied context is used as-is; no request timeout is added.
    pub context: Option<Context>,
    pub client: Option<HttpClient>,
}

impl<R> ClientOperation<R> {
    pub fn new(id: impl Into<String>, method: Method, path_pattern: impl Into<String>, reader: R) -> Self {
        Self {
            id: id.into(),
            method,
            path_pattern: path_pattern.into(),
            params: Arc::new(NoParams),
            reader,
            consumes_media_types: Vec::new(),
            produces_media_types: Vec::new(),
            schemes: Vec::new(),
            auth_info: None,
            context: None,
            client: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: impl ClientRequestWriter + 'static) -> Self {
        self.params = Arc::new(params);
        self
    }

    #[must_use]
    pub fn with_consumes<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes_media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_produces<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces_media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_auth_info(mut self, auth: AuthInfo) -> Self {
        self.auth_info = Some(auth);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = Some(client);
        self
    }
}

impl<R> fmt::Debug for ClientOperation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOperation")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("path_pattern", &self.path_pattern)
            .field("consumes_media_types", &self.consumes_media_types)
            .field("produces_media_types", &self.produces_media_types)
            .field("schemes", &self.schemes)
            .field("auth_info", &self.auth_info.is_some())
            .field("context", &self.context)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
