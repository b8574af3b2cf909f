//! Connection-reuse decorator
//!
//! Dropping a partially read hyper body closes its connection. Wrapping the
//! body lets the remaining bytes be read off in the background instead, so
//! the connection goes back to the pool. A server that never ends its body
//! keeps that background task alive, which is why the decorator is opt-in.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body::{Frame, SizeHint};
use http_body_util::BodyExt;

use super::{Body, Transport};
use crate::error::BoxError;

/// Wraps a transport so every response body is drained once released.
#[derive(Clone)]
pub struct KeepAliveTransport {
    inner: Arc<dyn Transport>,
}

impl KeepAliveTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn inner(&self) -> &Arc<dyn Transport> {
        &self.inner
    }
}

impl Transport for KeepAliveTransport {
    fn round_trip(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, BoxError>> {
        Box::pin(async move {
            let response = self.inner.round_trip(request).await?;
            Ok(response.map(|body| DrainingBody::new(body).boxed()))
        })
    }
}

/// Response body that reads itself to the end when dropped unfinished.
pub struct DrainingBody {
    inner: Option<Body>,
    finished: bool,
}

impl DrainingBody {
    pub fn new(inner: Body) -> Self {
        Self {
            inner: Some(inner),
            finished: false,
        }
    }
}

impl http_body::Body for DrainingBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        let polled = Pin::new(inner).poll_frame(cx);
        if let Poll::Ready(None | Some(Err(_))) = &polled {
            self.finished = true;
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.finished || self.inner.as_ref().is_none_or(http_body::Body::is_end_stream)
    }

    fn size_hint(&self) -> SizeHint {
        self.inner
            .as_ref()
            .map_or_else(|| SizeHint::with_exact(0), http_body::Body::size_hint)
    }
}

impl Drop for DrainingBody {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let Some(mut body) = self.inner.take() else {
            return;
        };
        if http_body::Body::is_end_stream(&body) {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    while let Some(frame) = body.frame().await {
                        if let Err(e) = frame {
                            tracing::debug!("draining response body failed: {e}");
                            break;
                        }
                    }
                });
            }
            Err(_) => tracing::debug!("no runtime to drain response body; connection will close"),
        }
    }
}
