//! Bare HTTP client: a transport plus an optional cookie jar

use std::fmt;
use std::sync::Arc;

use http::{Request, Response};

use crate::cookie::{self, CookieStore};
use crate::error::{self, Result};
use crate::transport::{self, Body, Transport};

/// Executes requests over a [`Transport`], attaching and storing cookies when
/// a jar is configured.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    jar: Option<Arc<dyn CookieStore>>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(transport::default_transport())
    }
}

impl HttpClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, jar: None }
    }

    #[must_use]
    pub fn with_jar(mut self, jar: Option<Arc<dyn CookieStore>>) -> Self {
        self.jar = jar;
        self
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    #[must_use]
    pub fn jar(&self) -> Option<&Arc<dyn CookieStore>> {
        self.jar.as_ref()
    }

    /// Send `request` and return the response once its headers arrive.
    ///
    /// # Errors
    ///
    /// Returns a transport error for anything the transport reports.
    pub async fn execute(&self, mut request: Request<Body>) -> Result<Response<Body>> {
        let url = url::Url::parse(&request.uri().to_string()).ok();

        if let (Some(jar), Some(url)) = (&self.jar, &url) {
            cookie::add_cookie_header(request.headers_mut(), jar.as_ref(), url);
        }

        let response = self
            .transport
            .round_trip(request)
            .await
            .map_err(|e| match &url {
                Some(url) => error::transport(e).with_url(url.clone()),
                None => error::transport(e),
            })?;

        if let (Some(jar), Some(url)) = (&self.jar, &url) {
            cookie::store_response_cookies(response.headers(), jar.as_ref(), url);
        }

        Ok(response)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("jar", &self.jar.is_some())
            .finish_non_exhaustive()
    }
}
