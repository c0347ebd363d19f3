use crate::traits::{PushSocketError, Result};

/// Path of the push endpoint relative to the API base address
pub const PUSH_PATH: &str = "/ws";

/// Derive the push endpoint from an HTTP API base address
///
/// `http` becomes `ws` and `https` becomes `wss`; a trailing `/` is dropped
/// before [`PUSH_PATH`] is appended. Bases that already use `ws`/`wss` keep
/// their scheme.
///
/// # Examples
/// ```
/// use pushsockets::push_url;
///
/// assert_eq!(push_url("http://localhost:8000").unwrap(), "ws://localhost:8000/ws");
/// assert_eq!(push_url("https://api.example.com/").unwrap(), "wss://api.example.com/ws");
/// ```
pub fn push_url(base: &str) -> Result<String> {
    let base = base.trim().trim_end_matches('/');

    let (scheme, rest) = base
        .split_once("://")
        .ok_or_else(|| PushSocketError::InvalidUrl(format!("missing scheme in '{}'", base)))?;

    if rest.is_empty() {
        return Err(PushSocketError::InvalidUrl(format!("missing host in '{}'", base)));
    }

    let push_scheme = match scheme.to_ascii_lowercase().as_str() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(PushSocketError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    };

    Ok(format!("{}://{}{}", push_scheme, rest, PUSH_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_upgrades_to_ws() {
        assert_eq!(
            push_url("http://137.184.116.222:8000").unwrap(),
            "ws://137.184.116.222:8000/ws"
        );
    }

    #[test]
    fn test_https_upgrades_to_wss() {
        assert_eq!(push_url("https://api.example.com").unwrap(), "wss://api.example.com/ws");
    }

    #[test]
    fn test_base_path_is_kept() {
        assert_eq!(
            push_url("https://example.com/api/").unwrap(),
            "wss://example.com/api/ws"
        );
    }

    #[test]
    fn test_ws_scheme_passes_through() {
        assert_eq!(push_url("ws://127.0.0.1:9000").unwrap(), "ws://127.0.0.1:9000/ws");
    }

    #[test]
    fn test_rejects_unknown_or_missing_scheme() {
        assert!(matches!(push_url("ftp://host"), Err(PushSocketError::InvalidUrl(_))));
        assert!(matches!(push_url("localhost:8000"), Err(PushSocketError::InvalidUrl(_))));
        assert!(matches!(push_url("http://"), Err(PushSocketError::InvalidUrl(_))));
    }
}
