#![forbid(unsafe_code)]

use std::io::Read;

pub(crate) const MAX_BODY_BYTES: usize = 64 * 1024;
const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Why a request body could not be taken at face value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BodyError {
    /// Declared `Content-Length` exceeds `MAX_BODY_BYTES`; the body was not read.
    TooLarge,
    /// `Content-Length` is present but is not a byte count.
    InvalidLength,
}

#[derive(Debug)]
pub(crate) struct HttpRequest {
    pub(crate) method: String,
    /// Raw request target, query string included.
    pub(crate) target: String,
    headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) body_error: Option<BodyError>,
}

impl HttpRequest {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn path(&self) -> String {
        super::normalize_path(&self.target)
    }

    pub(crate) fn query(&self) -> Result<super::QueryParams, super::QueryError> {
        super::QueryParams::parse(&self.target)
    }
}

pub(crate) fn read_request(stream: &mut impl Read) -> std::io::Result<Option<HttpRequest>> {
    let mut buf = [0u8; 4096];
    let mut data = Vec::<u8>::new();
    loop {
        let read = match stream.read(&mut buf) {
            Ok(read) => read,
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                break;
            }
            Err(err) => return Err(err),
        };
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        if data.windows(4).any(|w| w == b"\r\n\r\n") || data.len() > MAX_HEADER_BYTES {
            break;
        }
    }
    if data.is_empty() {
        return Ok(None);
    }

    let header_end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
        .unwrap_or(data.len());
    let header_bytes = &data[..header_end];
    let mut body = data[header_end..].to_vec();

    let header_text = String::from_utf8_lossy(header_bytes);
    let mut lines = header_text.split("\r\n");
    let Some(request_line) = lines.next() else {
        return Ok(None);
    };
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_ascii_uppercase();
    let target = parts.next().unwrap_or("/").to_string();
    if method.is_empty() {
        return Ok(None);
    }

    let mut headers = Vec::new();
    let mut content_length: usize = 0;
    let mut body_error = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        if name == "content-length" {
            match value.parse::<usize>() {
                Ok(length) => content_length = length,
                Err(_) => body_error = Some(BodyError::InvalidLength),
            }
        }
        headers.push((name, value));
    }

    if content_length > MAX_BODY_BYTES {
        body_error = Some(BodyError::TooLarge);
    }
    if body_error.is_some() {
        return Ok(Some(HttpRequest {
            method,
            target,
            headers,
            body: Vec::new(),
            body_error,
        }));
    }

    if content_length > body.len() {
        let mut remaining = content_length - body.len();
        while remaining > 0 {
            let read = match stream.read(&mut buf) {
                Ok(read) => read,
                Err(err)
                    if matches!(
                        err.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    break;
                }
                Err(err) => return Err(err),
            };
            if read == 0 {
                break;
            }
            let take = read.min(remaining);
            body.extend_from_slice(&buf[..take]);
            remaining -= take;
        }
    } else {
        body.truncate(content_length);
    }

    Ok(Some(HttpRequest {
        method,
        target,
        headers,
        body,
        body_error: None,
    }))
}

#[cfg(test)]
pub(crate) fn request_for_test(
    method: &str,
    target: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> HttpRequest {
    HttpRequest {
        method: method.to_string(),
        target: target.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect(),
        body: body.to_vec(),
        body_error: None,
    }
}
