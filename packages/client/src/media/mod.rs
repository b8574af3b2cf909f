//! Media types and the codecs registered against them
//!
//! A `Producer` turns a `Payload` into request body bytes; a `Consumer` turns
//! response body bytes back into a `Payload`. The runtime keeps one table of
//! each, keyed by media type.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{self, Result};

mod bytestream;
mod json;
mod text;
mod xml;

pub use bytestream::{ByteStreamConsumer, ByteStreamProducer};
pub use json::{JsonConsumer, JsonProducer};
pub use text::{TextConsumer, TextProducer};
pub use xml::{XmlConsumer, XmlProducer};

pub const JSON_MIME: &str = "application/json";
pub const XML_MIME: &str = "application/xml";
pub const TEXT_MIME: &str = "text/plain";
pub const HTML_MIME: &str = "text/html";
pub const DEFAULT_MIME: &str = "application/octet-stream";
pub const MULTIPART_FORM_MIME: &str = "multipart/form-data";
pub const URLENCODED_FORM_MIME: &str = "application/x-www-form-urlencoded";
/// Key of the catch-all consumer.
pub const WILDCARD_MIME: &str = "*/*";

pub type Consumers = HashMap<String, Arc<dyn Consumer>>;
pub type Producers = HashMap<String, Arc<dyn Producer>>;

/// A body value in transit between the caller and a codec.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Structured(serde_json::Value),
    Text(String),
    Bytes(Bytes),
}

impl Payload {
    /// Wrap any serializable value as a structured payload.
    ///
    /// # Errors
    ///
    /// Returns a codec error when `value` cannot be represented as JSON data.
    pub fn structured<T: serde::Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Payload::Structured)
            .map_err(error::codec)
    }

    /// Deserialize the payload into a caller-defined type.
    ///
    /// Text payloads deserialize as a JSON string, byte payloads are parsed as
    /// JSON text.
    ///
    /// # Errors
    ///
    /// Returns a codec error when the payload does not fit `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Structured(value) => serde_json::from_value(value).map_err(error::codec),
            Payload::Text(text) => {
                serde_json::from_value(serde_json::Value::String(text)).map_err(error::codec)
            }
            Payload::Bytes(bytes) => serde_json::from_slice(&bytes).map_err(error::codec),
        }
    }

    #[must_use]
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Structured(value) => Some(value),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Structured(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_owned())
    }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Payload::Bytes(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(value))
    }
}

/// Decodes response body bytes.
pub trait Consumer: Send + Sync {
    /// # Errors
    ///
    /// Returns a codec error when the bytes are not valid for the media type.
    fn consume(&self, body: Bytes) -> Result<Payload>;
}

/// Encodes a request body.
pub trait Producer: Send + Sync {
    /// # Errors
    ///
    /// Returns a codec error when the payload cannot be written in the media type.
    fn produce(&self, payload: &Payload) -> Result<Bytes>;
}

impl<F> Consumer for F
where
    F: Fn(Bytes) -> Result<Payload> + Send + Sync,
{
    fn consume(&self, body: Bytes) -> Result<Payload> {
        self(body)
    }
}

impl<F> Producer for F
where
    F: Fn(&Payload) -> Result<Bytes> + Send + Sync,
{
    fn produce(&self, payload: &Payload) -> Result<Bytes> {
        self(payload)
    }
}

/// JSON, XML, plain text, HTML-as-text and the byte-stream fallback.
#[must_use]
pub fn default_consumers() -> Consumers {
    let mut consumers: Consumers = HashMap::new();
    consumers.insert(JSON_MIME.to_owned(), Arc::new(JsonConsumer));
    consumers.insert(XML_MIME.to_owned(), Arc::new(XmlConsumer));
    consumers.insert(TEXT_MIME.to_owned(), Arc::new(TextConsumer));
    consumers.insert(HTML_MIME.to_owned(), Arc::new(TextConsumer));
    consumers.insert(DEFAULT_MIME.to_owned(), Arc::new(ByteStreamConsumer));
    consumers
}

/// Producer counterpart of [`default_consumers`].
#[must_use]
pub fn default_producers() -> Producers {
    let mut producers: Producers = HashMap::new();
    producers.insert(JSON_MIME.to_owned(), Arc::new(JsonProducer));
    producers.insert(XML_MIME.to_owned(), Arc::new(XmlProducer));
    producers.insert(TEXT_MIME.to_owned(), Arc::new(TextProducer));
    producers.insert(HTML_MIME.to_owned(), Arc::new(TextProducer));
    producers.insert(DEFAULT_MIME.to_owned(), Arc::new(ByteStreamProducer));
    producers
}

/// Whether `media_type` is a form encoding the request builder handles itself.
#[must_use]
pub fn is_form_media_type(media_type: &str) -> bool {
    media_type == MULTIPART_FORM_MIME || media_type == URLENCODED_FORM_MIME
}

/// Parse a `Content-Type` header value down to its lowercase essence,
/// dropping parameters such as `charset`.
///
/// # Errors
///
/// Returns a content-type error for malformed values.
pub fn parse_media_type(value: &str) -> Result<String> {
    let mime: mime::Mime = value.trim().parse().map_err(error::content_type)?;
    Ok(mime.essence_str().to_ascii_lowercase())
}
