use bytes::Bytes;

use super::{Consumer, Payload, Producer};
use crate::error::{self, Result};

/// `application/json` decoder. An empty body decodes to `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConsumer;

impl Consumer for JsonConsumer {
    fn consume(&self, body: Bytes) -> Result<Payload> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload::Structured(serde_json::Value::Null));
        }
        serde_json::from_slice(&body)
            .map(Payload::Structured)
            .map_err(error::codec)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonProducer;

impl Producer for JsonProducer {
    fn produce(&self, payload: &Payload) -> Result<Bytes> {
        let encoded = match payload {
            Payload::Structured(value) => serde_json::to_vec(value),
            Payload::Text(text) => serde_json::to_vec(text),
            Payload::Bytes(bytes) => return Ok(bytes.clone()),
        };
        encoded.map(Bytes::from).map_err(error::codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_object() {
        let payload = JsonConsumer
            .consume(Bytes::from_static(br#"{"x":1}"#))
            .unwrap();
        assert_eq!(payload, Payload::Structured(serde_json::json!({"x": 1})));
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(
            JsonConsumer.consume(Bytes::new()).unwrap(),
            Payload::Structured(serde_json::Value::Null)
        );
    }

    #[test]
    fn invalid_json_is_codec_error() {
        let err = JsonConsumer.consume(Bytes::from_static(b"{nope")).unwrap_err();
        assert!(err.is_codec());
    }

    #[test]
    fn text_is_produced_as_json_string() {
        let bytes = JsonProducer.produce(&Payload::from("hi")).unwrap();
        assert_eq!(&bytes[..], br#""hi""#);
    }
}
