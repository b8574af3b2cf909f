use bytes::Bytes;

use super::{Consumer, Payload, Producer};
use crate::error::{self, Result};

/// Root element used when a structured value is written as XML.
const ROOT_ELEMENT: &str = "root";

/// `application/xml` decoder.
///
/// Elements become object keys; text content lands under `$text`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlConsumer;

impl Consumer for XmlConsumer {
    fn consume(&self, body: Bytes) -> Result<Payload> {
        let text = std::str::from_utf8(&body).map_err(error::codec)?;
        quick_xml::de::from_str::<serde_json::Value>(text)
            .map(Payload::Structured)
            .map_err(error::codec)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlProducer;

impl Producer for XmlProducer {
    fn produce(&self, payload: &Payload) -> Result<Bytes> {
        match payload {
            Payload::Structured(value) => quick_xml::se::to_string_with_root(ROOT_ELEMENT, value)
                .map(Bytes::from)
                .map_err(error::codec),
            Payload::Text(text) => Ok(Bytes::from(text.clone())),
            Payload::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_rooted_document() {
        let bytes = XmlProducer
            .produce(&Payload::Structured(serde_json::json!({"name": "rex"})))
            .unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with("<root>"));
        assert!(text.contains("<name>rex</name>"));
    }

    #[test]
    fn raw_text_passes_through() {
        let bytes = XmlProducer.produce(&Payload::from("<a/>")).unwrap();
        assert_eq!(&bytes[..], b"<a/>");
    }
}
