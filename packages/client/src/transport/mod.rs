//! Transports carry one request to the network and hand back the response
//!
//! `HyperTransport` is the default, pooled implementation. `KeepAliveTransport`
//! decorates any transport so unread response bodies are drained instead of
//! dropped, which lets the pool reuse the connection.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};

use crate::error::BoxError;

mod pooled;
mod keepalive;

pub use pooled::{HyperTransport, default_transport};
pub use keepalive::{DrainingBody, KeepAliveTransport};

/// Request and response body type shared by every transport.
pub type Body = BoxBody<Bytes, BoxError>;

/// Performs a single HTTP round trip.
///
/// Errors are returned as-is; the client wraps them as transport errors.
pub trait Transport: Send + Sync {
    fn round_trip(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, BoxError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn round_trip(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, BoxError>> {
        (**self).round_trip(request)
    }
}

/// Body holding `bytes` in full.
pub fn full(bytes: impl Into<Bytes>) -> Body {
    Full::new(bytes.into()).map_err(|never| match never {}).boxed()
}

#[must_use]
pub fn empty() -> Body {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}
