#![forbid(unsafe_code)]

use serde_json::{Value, json};
use std::io::Write;

pub(crate) const JSON: &str = "application/json; charset=utf-8";

#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub(crate) status: &'static str,
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(&'static str, String)>,
}

impl HttpResponse {
    pub(crate) fn json(status: &'static str, value: &Value) -> Self {
        Self {
            status,
            content_type: JSON,
            body: value.to_string().into_bytes(),
            headers: Vec::new(),
        }
    }

    pub(crate) fn ok(value: &Value) -> Self {
        Self::json("200 OK", value)
    }

    pub(crate) fn created(value: &Value) -> Self {
        Self::json("201 Created", value)
    }

    pub(crate) fn no_content() -> Self {
        Self {
            status: "204 No Content",
            content_type: JSON,
            body: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub(crate) fn error(status: &'static str, code: &str, message: &str) -> Self {
        Self::json(status, &json!({ "error": message, "code": code }))
    }

    pub(crate) fn asset(content_type: &'static str, body: &'static str) -> Self {
        Self {
            status: "200 OK",
            content_type,
            body: body.as_bytes().to_vec(),
            headers: Vec::new(),
        }
    }

    pub(crate) fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub(crate) fn status_code(&self) -> u16 {
        self.status
            .split_whitespace()
            .next()
            .and_then(|code| code.parse::<u16>().ok())
            .unwrap_or(500)
    }
}

pub(crate) fn write_response(
    stream: &mut impl Write,
    response: &HttpResponse,
    head_only: bool,
) -> std::io::Result<()> {
    let mut headers = String::new();
    headers.push_str("HTTP/1.1 ");
    headers.push_str(response.status);
    headers.push_str("\r\n");
    headers.push_str("Content-Type: ");
    headers.push_str(response.content_type);
    headers.push_str("\r\n");
    headers.push_str("Cache-Control: no-store\r\n");
    headers.push_str("X-Content-Type-Options: nosniff\r\n");
    headers.push_str("Content-Security-Policy: default-src 'self'; style-src 'self'; script-src 'self';\r\n");
    headers.push_str("Connection: close\r\n");
    for (name, value) in &response.headers {
        headers.push_str(name);
        headers.push_str(": ");
        headers.push_str(value);
        headers.push_str("\r\n");
    }
    headers.push_str("Content-Length: ");
    headers.push_str(&response.body.len().to_string());
    headers.push_str("\r\n\r\n");

    stream.write_all(headers.as_bytes())?;
    if !head_only {
        stream.write_all(&response.body)?;
    }
    stream.flush()
}
