use super::types::{BoxError, Error, Kind};

/// Creates an `Error` for a request that could not be assembled.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a media type with no registered producer.
///
/// The registered set is sorted so the message is stable.
pub fn no_producer<'a, I>(media_type: &str, registered: I) -> Error
where
    I: IntoIterator<Item = &'a String>,
{
    let mut registered: Vec<String> = registered.into_iter().cloned().collect();
    registered.sort();
    Error::new(Kind::NoProducer {
        media_type: media_type.to_owned(),
        registered,
    })
}

/// Creates an `Error` for a response media type with no registered consumer.
pub fn no_consumer(media_type: &str) -> Error {
    Error::new(Kind::NoConsumer {
        media_type: media_type.to_owned(),
    })
}

/// Creates an `Error` for an unparseable `Content-Type` header.
pub fn content_type<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::ContentType).with(e.into())
}

/// Creates an `Error` for a failed round trip.
pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport).with(e.into())
}

/// Creates an `Error` for a failed debug dump.
pub fn dump<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Dump).with(e.into())
}

/// Creates an `Error` for a codec failure.
pub fn codec<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Codec).with(e.into())
}

/// Creates an `Error` for a response status the reader does not accept.
pub fn api(status: http::StatusCode, message: impl Into<String>) -> Error {
    let message: String = message.into();
    let err = Error::new(Kind::Api { status });
    if message.is_empty() {
        err
    } else {
        err.with(message)
    }
}
