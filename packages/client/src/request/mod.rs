//! Request assembly
//!
//! `ClientRequest` collects the params an operation's writer places on it and
//! then materializes a wire request with `build_http`. The result carries only
//! a path and query; scheme and host are filled in by the runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};

use crate::auth::ClientAuthInfoWriter;
use crate::config::DEFAULT_TIMEOUT;
use crate::error::{self, Result};
use crate::formats::Formats;
use crate::media::{self, Payload, Producers};

mod form;
mod writer;

pub use form::FileField;
pub use writer::{ClientRequestWriter, NoParams};

/// A request under construction for one operation call.
pub struct ClientRequest {
    method: Method,
    path_pattern: String,
    writer: Arc<dyn ClientRequestWriter>,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    path_params: HashMap<String, String>,
    form_fields: Vec<(String, String)>,
    file_fields: Vec<(String, FileField)>,
    payload: Option<Payload>,
    timeout: Duration,
}

impl ClientRequest {
    /// Start a request for `method` on `path_pattern`.
    ///
    /// The writer is applied when the request is built, so params it sets
    /// (including the timeout) are in place before the call is sent.
    ///
    /// # Errors
    ///
    /// Fails with a builder error when the path pattern is empty.
    pub fn new(
        method: Method,
        path_pattern: impl Into<String>,
        writer: Arc<dyn ClientRequestWriter>,
    ) -> Result<Self> {
        let path_pattern = path_pattern.into();
        if path_pattern.is_empty() {
            return Err(error::builder("operation path pattern is empty"));
        }
        Ok(Self {
            method,
            path_pattern,
            writer,
            headers: HeaderMap::new(),
            query: Vec::new(),
            path_params: HashMap::new(),
            form_fields: Vec::new(),
            file_fields: Vec::new(),
            payload: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path_pattern(&self) -> &str {
        &self.path_pattern
    }

    /// Replace every value of header `name` with `values`, in order.
    ///
    /// An empty `values` removes the header.
    ///
    /// # Errors
    ///
    /// Fails on an invalid header name or value.
    pub fn set_header_param<V: AsRef<str>>(&mut self, name: &str, values: &[V]) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        self.headers.remove(&name);
        for value in values {
            self.headers
                .append(name.clone(), HeaderValue::from_str(value.as_ref())?);
        }
        Ok(())
    }

    #[must_use]
    pub fn header_params(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Replace every value of query param `name` with `values`.
    pub fn set_query_param<V: AsRef<str>>(&mut self, name: &str, values: &[V]) {
        self.query.retain(|(k, _)| k != name);
        self.query.extend(
            values
                .iter()
                .map(|v| (name.to_owned(), v.as_ref().to_owned())),
        );
    }

    #[must_use]
    pub fn query_params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Set the value substituted for `{name}` in the path pattern.
    pub fn set_path_param(&mut self, name: &str, value: impl Into<String>) {
        self.path_params.insert(name.to_owned(), value.into());
    }

    pub fn set_form_param<V: AsRef<str>>(&mut self, name: &str, values: &[V]) {
        self.form_fields.retain(|(k, _)| k != name);
        self.form_fields.extend(
            values
                .iter()
                .map(|v| (name.to_owned(), v.as_ref().to_owned())),
        );
    }

    /// Attach files under form field `name`. Any file forces multipart encoding.
    pub fn set_file_param(&mut self, name: &str, files: Vec<FileField>) {
        self.file_fields.retain(|(k, _)| k != name);
        self.file_fields
            .extend(files.into_iter().map(|f| (name.to_owned(), f)));
    }

    pub fn set_body_param(&mut self, payload: impl Into<Payload>) {
        self.payload = Some(payload.into());
    }

    #[must_use]
    pub fn body_param(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Timeout layered onto the call when the operation brings no context.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Materialize the wire request.
    ///
    /// Applies the params writer, then the auth writer, then assembles the
    /// path, query, headers and body. The body is a form encoding when form or
    /// file params are present, otherwise the body param run through the
    /// producer registered for `media_type`.
    ///
    /// # Errors
    ///
    /// Writer and auth errors pass through unchanged; a body param with no
    /// producer for `media_type` is a no-producer error.
    pub fn build_http(
        &mut self,
        media_type: &str,
        base_path: &str,
        producers: &Producers,
        formats: &Formats,
        auth: Option<&dyn ClientAuthInfoWriter>,
    ) -> Result<Request<Bytes>> {
        let writer = Arc::clone(&self.writer);
        writer.write_to_request(self, formats)?;

        if let Some(auth) = auth {
            auth.authenticate_request(self, formats)?;
        }

        let mut path = join_path(base_path, &self.path_pattern);
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(value));
        }

        let path_and_query = if self.query.is_empty() {
            path
        } else {
            let query = serde_urlencoded::to_string(&self.query).map_err(error::builder)?;
            format!("{path}?{query}")
        };
        let uri = Uri::try_from(path_and_query)?;

        let mut headers = self.headers.clone();
        let body = if !self.form_fields.is_empty() || !self.file_fields.is_empty() {
            if media_type == media::MULTIPART_FORM_MIME || !self.file_fields.is_empty() {
                let boundary = form::new_boundary();
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_str(&format!(
                        "{}; boundary={boundary}",
                        media::MULTIPART_FORM_MIME
                    ))?,
                );
                form::multipart(&boundary, &self.form_fields, &self.file_fields)
            } else {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(media::URLENCODED_FORM_MIME),
                );
                form::urlencoded(&self.form_fields)?
            }
        } else if let Some(payload) = &self.payload {
            let producer = producers
                .get(media_type)
                .ok_or_else(|| error::no_producer(media_type, producers.keys()))?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(media_type)?);
            producer.produce(payload)?
        } else {
            Bytes::new()
        };

        let mut request = Request::builder()
            .method(self.method.clone())
            .uri(uri)
            .body(body)?;
        *request.headers_mut() = headers;
        Ok(request)
    }
}

/// Join base path and pattern, collapsing duplicate separators and dot
/// segments. A trailing slash on the pattern survives the join.
fn join_path(base_path: &str, pattern: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base_path.split('/').chain(pattern.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut joined = format!("/{}", segments.join("/"));
    if pattern != "/" && pattern.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::media::{default_producers, JSON_MIME, URLENCODED_FORM_MIME};

    fn request_with<W: ClientRequestWriter + 'static>(method: Method, path: &str, writer: W) -> ClientRequest {
        ClientRequest::new(method, path, Arc::new(writer)).unwrap()
    }

    fn build(request: &mut ClientRequest, media_type: &str) -> Result<Request<Bytes>> {
        request.build_http(
            media_type,
            "/api/v1",
            &default_producers(),
            &Formats::default(),
            None,
        )
    }

    #[test]
    fn join_path_normalizes() {
        assert_eq!(join_path("/", "/pets"), "/pets");
        assert_eq!(join_path("/api/", "/pets/"), "/api/pets/");
        assert_eq!(join_path("/api", "/"), "/api");
        assert_eq!(join_path("/api/v1", "../v2/pets"), "/api/v2/pets");
    }

    #[test]
    fn empty_path_pattern_rejected() {
        let err = ClientRequest::new(Method::GET, "", Arc::new(NoParams))
            .err()
            .unwrap();
        assert!(err.is_builder());
    }

    #[test]
    fn path_and_query_params_are_encoded() {
        let mut request = request_with(
            Method::GET,
            "/pets/{id}",
            |r: &mut ClientRequest, _: &Formats| -> Result<()> {
                r.set_path_param("id", "a b/c");
                r.set_query_param("tag", &["x", "y z"]);
                Ok(())
            },
        );
        let built = build(&mut request, JSON_MIME).unwrap();
        assert_eq!(
            built.uri().to_string(),
            "/api/v1/pets/a%20b%2Fc?tag=x&tag=y+z"
        );
        assert!(built.body().is_empty());
        assert!(built.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn body_param_uses_producer_and_sets_content_type() {
        let mut request = request_with(Method::POST, "/pets", |r: &mut ClientRequest, _: &Formats| -> Result<()> {
            r.set_body_param(serde_json::json!({"name": "rex"}));
            Ok(())
        });
        let built = build(&mut request, JSON_MIME).unwrap();
        assert_eq!(built.headers()[CONTENT_TYPE], JSON_MIME);
        assert_eq!(&built.body()[..], br#"{"name":"rex"}"#);
    }

    #[test]
    fn body_param_without_producer_fails() {
        let mut request = request_with(Method::POST, "/pets", |r: &mut ClientRequest, _: &Formats| -> Result<()> {
            r.set_body_param("x");
            Ok(())
        });
        let err = build(&mut request, "application/x-foo").unwrap_err();
        assert!(err.is_no_producer());
    }

    #[test]
    fn form_params_are_urlencoded() {
        let mut request = request_with(Method::POST, "/login", |r: &mut ClientRequest, _: &Formats| -> Result<()> {
            r.set_form_param("user", &["ann"]);
            Ok(())
        });
        let built = build(&mut request, URLENCODED_FORM_MIME).unwrap();
        assert_eq!(built.headers()[CONTENT_TYPE], URLENCODED_FORM_MIME);
        assert_eq!(&built.body()[..], b"user=ann");
    }

    #[test]
    fn file_params_force_multipart() {
        let mut request = request_with(Method::POST, "/upload", |r: &mut ClientRequest, _: &Formats| -> Result<()> {
            r.set_file_param("file", vec![FileField::new("a.txt", "hello")]);
            Ok(())
        });
        let built = build(&mut request, JSON_MIME).unwrap();
        let content_type = built.headers()[CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(String::from_utf8_lossy(built.body()).contains("hello"));
    }

    #[test]
    fn writer_errors_pass_through() {
        let mut request = request_with(Method::GET, "/pets", |_: &mut ClientRequest, _: &Formats| -> Result<()> {
            Err(error::codec("bad param"))
        });
        let err = build(&mut request, JSON_MIME).unwrap_err();
        assert!(err.is_codec());
    }

    #[test]
    fn header_params_replace_previous_values() {
        let mut request = request_with(Method::GET, "/pets", NoParams);
        request.set_header_param("Accept", &["a/b", "c/d"]).unwrap();
        assert_eq!(request.header_params("accept"), vec!["a/b", "c/d"]);
        request.set_header_param("Accept", &["e/f"]).unwrap();
        assert_eq!(request.header_params("accept"), vec!["e/f"]);
    }

    #[test]
    fn writer_can_change_timeout() {
        let mut request = request_with(Method::GET, "/pets", |r: &mut ClientRequest, _: &Formats| -> Result<()> {
            r.set_timeout(Duration::from_millis(5));
            Ok(())
        });
        assert_eq!(request.timeout(), DEFAULT_TIMEOUT);
        build(&mut request, JSON_MIME).unwrap();
        assert_eq!(request.timeout(), Duration::from_millis(5));
    }
}
