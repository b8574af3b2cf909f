use bytes::Bytes;

use super::{Consumer, Payload, Producer};
use crate::error::{self, Result};

/// Fallback decoder that hands the raw body back untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteStreamConsumer;

impl Consumer for ByteStreamConsumer {
    fn consume(&self, body: Bytes) -> Result<Payload> {
        Ok(Payload::Bytes(body))
    }
}

/// Writes raw bytes or text. Structured values have no byte representation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteStreamProducer;

impl Producer for ByteStreamProducer {
    fn produce(&self, payload: &Payload) -> Result<Bytes> {
        match payload {
            Payload::Bytes(bytes) => Ok(bytes.clone()),
            Payload::Text(text) => Ok(Bytes::from(text.clone())),
            Payload::Structured(_) => Err(error::codec(
                "structured payload cannot be written as a byte stream",
            )),
        }
    }
}
