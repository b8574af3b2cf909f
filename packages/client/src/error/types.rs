use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `oasrt_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Represents every failure surfaced while assembling, sending or decoding
/// an operation.
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) source: Option<BoxError>,
    pub(crate) url: Option<url::Url>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// The request could not be assembled from the operation's parameters.
    Builder,
    /// The negotiated request media type has no registered producer.
    NoProducer {
        media_type: String,
        registered: Vec<String>,
    },
    /// The response media type has no registered consumer and no `*/*` fallback.
    NoConsumer { media_type: String },
    /// The response `Content-Type` header could not be parsed.
    ContentType,
    /// Network, TLS or context failure during the round trip.
    Transport,
    /// The debug trace of a request or response could not be rendered.
    Dump,
    /// A producer or consumer failed to encode or decode a body.
    Codec,
    /// A response reader rejected the response status.
    Api { status: http::StatusCode },
    /// TLS identity or trust-root construction failed.
    Tls,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                url: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("oasrt_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", url);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Builder => f.write_str("error building request")?,
            Kind::NoProducer {
                media_type,
                registered,
            } => write!(
                f,
                "none of producers: [{}] registered. try {media_type}",
                registered.join(", ")
            )?,
            Kind::NoConsumer { media_type } => write!(f, "no consumer: {media_type:?}")?,
            Kind::ContentType => f.write_str("parse content type")?,
            Kind::Transport => f.write_str("error sending request")?,
            Kind::Dump => f.write_str("error dumping http message")?,
            Kind::Codec => f.write_str("error encoding or decoding body")?,
            Kind::Api { status } => write!(f, "unexpected response status ({status})")?,
            Kind::Tls => f.write_str("tls configuration error")?,
        }

        if let Some(url) = &self.inner.url {
            write!(f, " for url ({url})")?;
        }

        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
