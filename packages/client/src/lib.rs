//! # oasrt client building blocks
//!
//! Everything the operation runtime is assembled from:
//!
//! - **TLS identities** built from certificate, key and CA material
//! - **Transports** on hyper and rustls, plus a connection-reuse decorator
//! - **Codecs** for JSON, XML, text and byte streams, keyed by media type
//! - **Request assembly** from an operation's parameter writer
//! - **Authentication writers**, cookie jars and execution contexts
//!
//! The `oasrt` crate drives these through `Runtime::submit`.

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod cookie;
pub mod dump;
pub mod error;
pub mod formats;
pub mod logger;
pub mod media;
pub mod request;
pub mod response;
pub mod scheme;
pub mod tls;
pub mod transport;

pub use auth::{AuthInfo, ClientAuthInfoWriter};
pub use client::HttpClient;
pub use config::{DEFAULT_TIMEOUT, TransportConfig};
pub use context::{Context, ContextError};
pub use cookie::{CookieStore, Jar};
pub use error::{BoxError, Error, Kind, Result};
pub use formats::Formats;
pub use logger::{Logger, StandardLogger};
pub use media::{Consumer, Consumers, Payload, Producer, Producers};
pub use request::{ClientRequest, ClientRequestWriter};
pub use response::{ClientResponse, PayloadReader, ResponseReader, TypedReader};
pub use tls::{TlsClientConfig, TlsClientOptions, TlsError, tls_client, tls_client_auth, tls_transport};
pub use transport::{Body, HyperTransport, KeepAliveTransport, Transport};

pub use http;
pub use url::Url;
