#![allow(dead_code)]

use std::fmt;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use axum::Router;
use bytes::Bytes;
use futures::future::BoxFuture;
use http_body::Frame;
use http_body_util::{BodyExt, Full};
use tokio::sync::mpsc;
use oasrt::http::{HeaderMap, Request, Response, StatusCode, Uri};
use oasrt::{Body, BoxError, Logger, Transport};

/// Serve `app` on an ephemeral local port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Body whose bytes arrive only when the sending task provides them.
struct ChannelBody(mpsc::Receiver<Bytes>);

impl http_body::Body for ChannelBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, BoxError>>> {
        self.0.poll_recv(cx).map(|chunk| chunk.map(|bytes| Ok(Frame::data(bytes))))
    }
}

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport answering every request with a canned response and recording
/// what it was sent.
pub struct StubTransport {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: &'static str,
    delay: Duration,
    body_delay: Duration,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<Seen>>,
    pub body_closed: Arc<AtomicBool>,
}

impl StubTransport {
    pub fn new(status: u16, content_type: Option<&'static str>, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body,
            delay: Duration::ZERO,
            body_delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            body_closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn json(body: &'static str) -> Self {
        Self::new(200, Some("application/json"), body)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send headers at once but hold the body back for `delay`.
    pub fn with_body_delay(mut self, delay: Duration) -> Self {
        self.body_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    pub fn body_closed(&self) -> bool {
        self.body_closed.load(Ordering::SeqCst)
    }
}

impl Transport for StubTransport {
    fn round_trip(&self, request: Request<Body>) -> BoxFuture<'_, Result<Response<Body>, BoxError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (parts, body) = request.into_parts();
            let body = body.collect().await?.to_bytes();
            self.seen.lock().unwrap().push(Seen {
                method: parts.method.to_string(),
                uri: parts.uri,
                headers: parts.headers,
                body,
            });

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.body_closed.store(false, Ordering::SeqCst);
            let guard = SetOnDrop(Arc::clone(&self.body_closed));
            let bytes = Bytes::from_static(self.body.as_bytes());
            let body = if self.body_delay.is_zero() {
                Full::new(bytes)
                    .map_err(|never| -> BoxError { match never {} })
                    .map_frame(move |frame| {
                        let _ = &guard;
                        frame
                    })
                    .boxed()
            } else {
                let (tx, rx) = mpsc::channel(1);
                let delay = self.body_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(bytes).await;
                });
                ChannelBody(rx)
                    .map_frame(move |frame| {
                        let _ = &guard;
                        frame
                    })
                    .boxed()
            };

            let mut response = Response::builder().status(self.status);
            if let Some(ct) = self.content_type {
                response = response.header("content-type", ct);
            }
            Ok(response.body(body)?)
        })
    }
}

/// Logger keeping every line it is given.
#[derive(Default)]
pub struct CapturingLogger {
    pub lines: Mutex<Vec<String>>,
}

impl CapturingLogger {
    pub fn joined(&self) -> String {
        self.lines.lock().unwrap().join("")
    }
}

impl Logger for CapturingLogger {
    fn debugf(&self, args: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push(args.to_string());
    }
}
