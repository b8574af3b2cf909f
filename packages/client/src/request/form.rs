//! Form body encodings: `application/x-www-form-urlencoded` and
//! `multipart/form-data`

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{self, Result};

/// A file sent as one part of a multipart form.
#[derive(Debug, Clone)]
pub struct FileField {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FileField {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

pub(crate) fn urlencoded(fields: &[(String, String)]) -> Result<Bytes> {
    serde_urlencoded::to_string(fields)
        .map(Bytes::from)
        .map_err(error::builder)
}

pub(crate) fn new_boundary() -> String {
    format!("{:032x}", fastrand::u128(..))
}

pub(crate) fn multipart(
    boundary: &str,
    fields: &[(String, String)],
    files: &[(String, FileField)],
) -> Bytes {
    let mut body = BytesMut::new();

    for (name, value) in fields {
        put_part_head(&mut body, boundary, name, None);
        body.put_slice(b"\r\n");
        body.put_slice(value.as_bytes());
        body.put_slice(b"\r\n");
    }

    for (name, file) in files {
        put_part_head(&mut body, boundary, name, Some(&file.file_name));
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or(crate::media::DEFAULT_MIME);
        body.put_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.put_slice(&file.data);
        body.put_slice(b"\r\n");
    }

    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    body.freeze()
}

fn put_part_head(body: &mut BytesMut, boundary: &str, name: &str, file_name: Option<&str>) {
    body.put_slice(format!("--{boundary}\r\n").as_bytes());
    let name = escape_quotes(name);
    match file_name {
        Some(file_name) => body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n",
                escape_quotes(file_name)
            )
            .as_bytes(),
        ),
        None => body.put_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
        ),
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
