//! Basic authentication utilities

use std::io::Write;

use base64::prelude::BASE64_STANDARD;
use base64::{Engine, write::EncoderWriter};
use http::header::AUTHORIZATION;

use super::ClientAuthInfoWriter;
use crate::error::{self, Result};
use crate::formats::Formats;
use crate::request::ClientRequest;

/// `Authorization: Basic` writer built by [`basic_auth`].
#[derive(Debug, Clone)]
pub struct BasicAuth {
    header: String,
}

impl ClientAuthInfoWriter for BasicAuth {
    fn authenticate_request(&self, request: &mut ClientRequest, _formats: &Formats) -> Result<()> {
        request.set_header_param(AUTHORIZATION.as_str(), &[&self.header])
    }
}

/// Writer that sends `Authorization: Basic <base64(user:pass)>`.
pub fn basic_auth(username: &str, password: &str) -> BasicAuth {
    let mut buf = b"Basic ".to_vec();
    {
        let mut encoder = EncoderWriter::new(&mut buf, &BASE64_STANDARD);
        let _ = write!(encoder, "{username}:{password}");
    }
    BasicAuth {
        header: String::from_utf8_lossy(&buf).into_owned(),
    }
}

/// Encode basic authentication credentials
pub fn encode_basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{username}:{password}");
    BASE64_STANDARD.encode(credentials.as_bytes())
}

/// Decode basic authentication credentials
///
/// # Errors
///
/// Fails on invalid base64, invalid UTF-8, or a missing `:` separator.
pub fn decode_basic_auth(encoded: &str) -> Result<(String, String)> {
    let decoded = BASE64_STANDARD
        .decode(encoded)
        .map_err(|_| error::builder("Invalid base64 encoding in authorization header"))?;

    let credentials = String::from_utf8(decoded)
        .map_err(|_| error::builder("Invalid UTF-8 in authorization header"))?;

    match credentials.split_once(':') {
        Some((user, pass)) => Ok((user.to_string(), pass.to_string())),
        None => Err(error::builder("Invalid format in authorization header")),
    }
}
