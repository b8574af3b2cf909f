//! HTTP/1.1-style rendering of requests and responses for debug traces

use std::fmt::Write as _;

use bytes::Bytes;
use http::{HeaderMap, Request};

use crate::error::{self, Result};

/// Render an outgoing request, body included.
///
/// # Errors
///
/// Fails when the request target has no authority to render a `Host` line from.
pub fn dump_request(request: &Request<Bytes>) -> Result<String> {
    let uri = request.uri();
    let authority = uri
        .authority()
        .ok_or_else(|| error::dump(format!("request uri {uri} has no host")))?;
    let target = uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    let mut out = String::new();
    let _ = write!(out, "{} {target} HTTP/1.1\r\n", request.method());
    let _ = write!(out, "Host: {authority}\r\n");
    write_headers(&mut out, request.headers());
    out.push_str("\r\n");
    push_body(&mut out, request.body());
    Ok(out)
}

/// Render a received response from its head and buffered body.
pub fn dump_response(parts: &http::response::Parts, body: &Bytes) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:?} {}\r\n", parts.version, parts.status);
    write_headers(&mut out, &parts.headers);
    out.push_str("\r\n");
    push_body(&mut out, body);
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        let _ = write!(out, "{}: {value}\r\n", canonical_name(name.as_str()));
    }
}

fn push_body(out: &mut String, body: &Bytes) {
    out.push_str(&String::from_utf8_lossy(body));
}

fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
