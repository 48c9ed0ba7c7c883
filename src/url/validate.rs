use url::Url;

/// Checks whether a string is an absolute `http` or `https` URL
///
/// Used both when accepting a seed URL and when filtering links discovered
/// during a crawl, before they are queued.
///
/// # Examples
///
/// ```
/// use spidey::url::is_valid_http_url;
///
/// assert!(is_valid_http_url("https://example.com/post"));
/// assert!(!is_valid_http_url("mailto:someone@example.com"));
/// assert!(!is_valid_http_url("/relative/path"));
/// ```
pub fn is_valid_http_url(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(is_valid_http_url("http://example.com"));
        assert!(is_valid_http_url("https://example.com/"));
        assert!(is_valid_http_url("https://sub.example.com/path?q=1#frag"));
        assert!(is_valid_http_url("http://127.0.0.1:8080/page"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!is_valid_http_url("ftp://example.com/file"));
        assert!(!is_valid_http_url("mailto:test@example.com"));
        assert!(!is_valid_http_url("javascript:void(0)"));
        assert!(!is_valid_http_url("tel:+1234567890"));
        assert!(!is_valid_http_url("data:text/html,<h1>x</h1>"));
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(!is_valid_http_url(""));
        assert!(!is_valid_http_url("   "));
        assert!(!is_valid_http_url("/relative/path"));
        assert!(!is_valid_http_url("example.com"));
        assert!(!is_valid_http_url("http://"));
        assert!(!is_valid_http_url("https://[::1"));
    }
}
