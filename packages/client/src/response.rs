//! Received responses and the readers that turn them into results

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::error::{self, Result};
use crate::media::{Consumer, Payload};
use crate::transport::{self, Body};

/// Response handed to a [`ResponseReader`].
///
/// Dropping it closes the body.
pub struct ClientResponse {
    inner: Response<Body>,
}

impl ClientResponse {
    pub fn new(inner: Response<Body>) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn code(&self) -> u16 {
        self.inner.status().as_u16()
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Canonical reason phrase for the status code.
    #[must_use]
    pub fn message(&self) -> &str {
        self.inner.status().canonical_reason().unwrap_or("")
    }

    /// First value of header `name`, if present and valid UTF-8.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn get_headers(&self, name: &str) -> Vec<&str> {
        self.inner
            .headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Read the rest of the body, leaving an empty one in its place.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the body stream fails.
    pub async fn bytes(&mut self) -> Result<Bytes> {
        let body = std::mem::replace(self.inner.body_mut(), transport::empty());
        let collected = body.collect().await.map_err(error::transport)?;
        Ok(collected.to_bytes())
    }

    /// Read the body and decode it with `consumer`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when reading fails and whatever the
    /// consumer returns when decoding fails.
    pub async fn consume(&mut self, consumer: &dyn Consumer) -> Result<Payload> {
        let body = self.bytes().await?;
        consumer.consume(body)
    }

    pub fn into_inner(self) -> Response<Body> {
        self.inner
    }
}

impl fmt::Debug for ClientResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientResponse")
            .field("status", &self.inner.status())
            .field("headers", self.inner.headers())
            .finish_non_exhaustive()
    }
}

/// Turns a response into the caller's result type.
///
/// Its result and error are returned from the runtime unchanged.
pub trait ResponseReader: Send + Sync {
    type Output: Send;

    fn read_response(
        &self,
        response: &mut ClientResponse,
        consumer: &dyn Consumer,
    ) -> impl Future<Output = Result<Self::Output>> + Send;
}

/// Decodes a 2xx body with the negotiated consumer.
///
/// Any other status becomes an API error carrying the body text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadReader;

impl ResponseReader for PayloadReader {
    type Output = Payload;

    async fn read_response(&self, response: &mut ClientResponse, consumer: &dyn Consumer) -> Result<Payload> {
        if response.status().is_success() {
            return response.consume(consumer).await;
        }
        let status = response.status();
        let body = response.bytes().await?;
        Err(error::api(status, String::from_utf8_lossy(&body)))
    }
}

/// [`PayloadReader`] followed by deserialization into `T`.
pub struct TypedReader<T>(PhantomData<fn() -> T>);

impl<T> TypedReader<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedReader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypedReader")
    }
}

impl<T: DeserializeOwned + Send> ResponseReader for TypedReader<T> {
    type Output = T;

    async fn read_response(&self, response: &mut ClientResponse, consumer: &dyn Consumer) -> Result<T> {
        PayloadReader.read_response(response, consumer).await?.into_typed()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::media::JsonConsumer;

    fn response(status: u16, body: &'static str) -> ClientResponse {
        let inner = Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(transport::full(body))
            .unwrap();
        ClientResponse::new(inner)
    }

    #[tokio::test]
    async fn payload_reader_decodes_success() {
        let mut resp = response(200, r#"{"x":1}"#);
        let payload = PayloadReader.read_response(&mut resp, &JsonConsumer).await.unwrap();
        assert_eq!(payload.as_structured(), Some(&serde_json::json!({"x": 1})));
    }

    #[tokio::test]
    async fn payload_reader_rejects_error_status() {
        let mut resp = response(404, "missing");
        let err = PayloadReader.read_response(&mut resp, &JsonConsumer).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn typed_reader_deserializes() {
        #[derive(Deserialize)]
        struct X {
            x: i64,
        }
        let mut resp = response(200, r#"{"x":7}"#);
        let x: X = TypedReader::new().read_response(&mut resp, &JsonConsumer).await.unwrap();
        assert_eq!(x.x, 7);
    }

    #[test]
    fn exposes_status_and_headers() {
        let resp = response(201, "");
        assert_eq!(resp.code(), 201);
        assert_eq!(resp.message(), "Created");
        assert_eq!(resp.get_header("Content-Type"), Some("application/json"));
    }
}
