#![forbid(unsafe_code)]

/// Upper bound for the raw query string. Comfortably fits the longest
/// category name percent-encoded byte by byte.
pub(crate) const MAX_QUERY_BYTES: usize = 4 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum QueryError {
    #[error("query string exceeds {} bytes", MAX_QUERY_BYTES)]
    TooLong,
    #[error("query parameter {key:?} has a malformed percent escape")]
    BadEscape { key: String },
    #[error("query parameter {key:?} is not valid UTF-8")]
    NotUtf8 { key: String },
}

/// Decoded `key=value` pairs of a request target, in order of appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub(crate) fn parse(target: &str) -> Result<Self, QueryError> {
        let Some((_, query)) = target.split_once('?') else {
            return Ok(Self::default());
        };
        let query = query.split('#').next().unwrap_or("");
        if query.len() > MAX_QUERY_BYTES {
            return Err(QueryError::TooLong);
        }

        let mut pairs = Vec::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = percent_decode(raw_key, raw_key)?;
            let value = percent_decode(raw_value, &key)?;
            pairs.push((key, value));
        }
        Ok(Self { pairs })
    }

    /// First non-blank value for `key`. Blank values count as absent, which is
    /// what an untouched form field submits.
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
    }
}

fn percent_decode(raw: &str, key: &str) -> Result<String, QueryError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0usize;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                out.push(b' ');
                idx += 1;
            }
            b'%' => {
                let escape = bytes
                    .get(idx + 1..idx + 3)
                    .and_then(|pair| Some((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?))
                    .ok_or_else(|| QueryError::BadEscape {
                        key: key.to_string(),
                    })?;
                out.push(escape);
                idx += 3;
            }
            byte => {
                out.push(byte);
                idx += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|_| QueryError::NotUtf8 {
        key: key.to_string(),
    })
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

pub(crate) fn normalize_path(raw: &str) -> String {
    let path = raw.trim().split(['?', '#']).next().unwrap_or("").trim();
    if path.is_empty() || path.len() > 256 || path.contains("..") || path.contains('\\') {
        return "/".to_string();
    }
    if path.len() > 1 {
        return path.trim_end_matches('/').to_string();
    }
    path.to_string()
}
