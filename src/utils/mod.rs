//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Turn an `href` found on the listing page into an absolute link.
///
/// Protocol-relative hrefs (`//host/path`) take the listing page's scheme,
/// absolute ones are kept, anything else is resolved against `base`.
/// Returns `None` for an empty href or one that cannot be resolved.
pub fn absolutize_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if href.starts_with("//") {
        return Some(format!("{}:{}", base.scheme(), href));
    }

    base.join(href).ok().map(|u| u.to_string())
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://absolute-rating.mirtesen.ru/?page=1").unwrap()
    }

    #[test]
    fn test_protocol_relative_gets_scheme() {
        assert_eq!(
            absolutize_link(&base(), "//absolute-rating.mirtesen.ru/blog/43123"),
            Some("https://absolute-rating.mirtesen.ru/blog/43123".to_string())
        );
    }

    #[test]
    fn test_absolute_href_is_kept() {
        assert_eq!(
            absolutize_link(&base(), "https://other.example.com/x"),
            Some("https://other.example.com/x".to_string())
        );
    }

    #[test]
    fn test_relative_href_is_resolved() {
        assert_eq!(
            absolutize_link(&base(), "/blog/43123"),
            Some("https://absolute-rating.mirtesen.ru/blog/43123".to_string())
        );
    }

    #[test]
    fn test_empty_href_is_rejected() {
        assert_eq!(absolutize_link(&base(), "   "), None);
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://absolute-rating.mirtesen.ru/?page=1"),
            Some("absolute-rating.mirtesen.ru".to_string())
        );
    }
}
