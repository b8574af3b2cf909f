//! # oasrt
//!
//! Runtime for API clients generated from OpenAPI/Swagger documents. A
//! [`Runtime`] holds the host, codecs, transport and defaults; each
//! [`ClientOperation`] describes one call and is executed with
//! [`Runtime::submit`].
//!
//! ```no_run
//! use oasrt::{ClientOperation, PayloadReader, Runtime, http::Method};
//!
//! # async fn run() -> oasrt::Result<()> {
//! let runtime = Runtime::new("petstore.example.com", "/v2", ["https"]);
//! let op = ClientOperation::new("listPets", Method::GET, "/pets", PayloadReader)
//!     .with_produces(["application/json"]);
//! let pets = runtime.submit(&op).await?;
//! # let _ = pets;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

mod operation;
mod runtime;

pub use operation::ClientOperation;
pub use runtime::Runtime;

pub use oasrt_client::{
    AuthInfo, Body, BoxError, ClientAuthInfoWriter, ClientRequest, ClientRequestWriter, ClientResponse, Consumer,
    Consumers, Context, ContextError, CookieStore, DEFAULT_TIMEOUT, Error, Formats, HttpClient, HyperTransport, Jar,
    KeepAliveTransport, Kind, Logger, Payload, PayloadReader, Producer, Producers, ResponseReader, Result,
    StandardLogger, TlsClientConfig, TlsClientOptions, TlsError, Transport, TransportConfig, TypedReader, Url, auth,
    error, http, media, request, scheme, tls, tls_client, tls_client_auth, tls_transport, transport,
};
