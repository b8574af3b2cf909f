use super::types::{Error, Kind};
use crate::tls::TlsError;

impl From<TlsError> for Error {
    fn from(err: TlsError) -> Self {
        Error::new(Kind::Tls).with(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        super::builder(err)
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        super::builder(err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        super::builder(err)
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        super::builder(err)
    }
}
