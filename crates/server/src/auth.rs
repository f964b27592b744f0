#![forbid(unsafe_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

pub(crate) const REALM: &str = "tareas";

/// HTTP Basic credentials. Only the digest of `user:password` is kept.
#[derive(Clone)]
pub(crate) struct BasicAuth {
    expected: [u8; 32],
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth").finish_non_exhaustive()
    }
}

impl BasicAuth {
    pub(crate) fn new(user: &str, password: &str) -> Self {
        Self {
            expected: digest(format!("{user}:{password}").as_bytes()),
        }
    }

    pub(crate) fn authorize(&self, header: Option<&str>) -> bool {
        let Some(header) = header else {
            return false;
        };
        let header = header.trim();
        let Some((scheme, encoded)) = header.split_once(' ') else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return false;
        }
        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let supplied = digest(&decoded);
        supplied
            .iter()
            .zip(self.expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    pub(crate) fn challenge() -> String {
        format!("Basic realm=\"{REALM}\"")
    }
}

fn digest(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[cfg(test)]
pub(crate) fn basic_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_credentials() {
        let auth = BasicAuth::new("ana", "s3creto");
        assert!(auth.authorize(Some(&basic_header("ana", "s3creto"))));
        assert!(auth.authorize(Some(&basic_header("ana", "s3creto").replace("Basic", "basic"))));
    }

    #[test]
    fn rejects_missing_malformed_or_wrong_credentials() {
        let auth = BasicAuth::new("ana", "s3creto");
        assert!(!auth.authorize(None));
        assert!(!auth.authorize(Some("Bearer abc")));
        assert!(!auth.authorize(Some("Basic !!!not-base64")));
        assert!(!auth.authorize(Some(&basic_header("ana", "otra"))));
        assert!(!auth.authorize(Some(&basic_header("luis", "s3creto"))));
    }

    #[test]
    fn passwords_may_contain_colons() {
        let auth = BasicAuth::new("ana", "a:b:c");
        assert!(auth.authorize(Some(&basic_header("ana", "a:b:c"))));
    }
}
