//! Security response headers.

use axum::http::HeaderValue;
use axum::http::header::{
    CONTENT_SECURITY_POLICY, HeaderName, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Inline styles stay allowed for the `<style>` blocks inside diagram SVGs.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data:; \
                   connect-src 'self'; \
                   form-action 'self'; \
                   frame-ancestors 'none'";

fn headers() -> [(HeaderName, &'static str); 3] {
    [
        (CONTENT_SECURITY_POLICY, CSP),
        (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (X_FRAME_OPTIONS, "DENY"),
    ]
}

/// One overriding layer per security header, applied to every response.
pub(crate) fn header_layers() -> [SetResponseHeaderLayer<HeaderValue>; 3] {
    headers().map(|(name, value)| {
        SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_locks_down_sources() {
        assert!(CSP.starts_with("default-src 'self';"));
        assert!(CSP.contains("script-src 'self';"));
        assert!(CSP.contains("frame-ancestors 'none'"));
        assert!(!CSP.contains("unsafe-eval"));
    }

    #[test]
    fn test_header_values_are_valid() {
        for (name, value) in headers() {
            assert!(HeaderValue::from_str(value).is_ok(), "{name}");
        }
    }
}
