use std::error::Error as StdError;
use std::io;

use super::types::{Error, Kind};
use crate::context::ContextError;

impl Error {
    /// Returns true if the request could not be assembled.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    #[must_use]
    pub fn is_no_producer(&self) -> bool {
        matches!(self.inner.kind, Kind::NoProducer { .. })
    }

    #[must_use]
    pub fn is_no_consumer(&self) -> bool {
        matches!(self.inner.kind, Kind::NoConsumer { .. })
    }

    #[must_use]
    pub fn is_content_type(&self) -> bool {
        matches!(self.inner.kind, Kind::ContentType)
    }

    /// Returns true if the error happened during the round trip.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.inner.kind, Kind::Transport)
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self.inner.kind, Kind::Tls)
    }

    #[must_use]
    pub fn is_codec(&self) -> bool {
        matches!(self.inner.kind, Kind::Codec)
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if let Some(ctx) = err.downcast_ref::<ContextError>()
                && *ctx == ContextError::DeadlineExceeded
            {
                return true;
            }
            if let Some(hyper_err) = err.downcast_ref::<hyper::Error>()
                && hyper_err.is_timeout()
            {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>()
                && io.kind() == io::ErrorKind::TimedOut
            {
                return true;
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the call's context was canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if let Some(ctx) = err.downcast_ref::<ContextError>()
                && *ctx == ContextError::Canceled
            {
                return true;
            }
            source = err.source();
        }

        false
    }

    /// Returns the status code carried by an `Api` error.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self.inner.kind {
            Kind::Api { status } => Some(status),
            _ => None,
        }
    }
}
