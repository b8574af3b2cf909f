use bytes::Bytes;

use super::{Consumer, Payload, Producer};
use crate::error::{self, Result};

/// Decoder for `text/plain` and `text/html`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextConsumer;

impl Consumer for TextConsumer {
    fn consume(&self, body: Bytes) -> Result<Payload> {
        String::from_utf8(body.to_vec())
            .map(Payload::Text)
            .map_err(error::codec)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextProducer;

impl Producer for TextProducer {
    fn produce(&self, payload: &Payload) -> Result<Bytes> {
        match payload {
            Payload::Text(text) => Ok(Bytes::from(text.clone())),
            Payload::Structured(serde_json::Value::String(text)) => Ok(Bytes::from(text.clone())),
            Payload::Structured(value) => Ok(Bytes::from(value.to_string())),
            Payload::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_rejected() {
        let err = TextConsumer
            .consume(Bytes::from_static(&[0xff, 0xfe]))
            .unwrap_err();
        assert!(err.is_codec());
    }

    #[test]
    fn string_value_is_written_bare() {
        let bytes = TextProducer
            .produce(&Payload::Structured(serde_json::json!("plain")))
            .unwrap();
        assert_eq!(&bytes[..], b"plain");
    }
}
