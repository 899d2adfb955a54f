//! Security headers added to every response.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Pages are self-contained apart from remote images, and the live reload
/// script talks to the server over a WebSocket.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data: https:; \
                   font-src 'self' data:; \
                   connect-src 'self' ws: wss:; \
                   frame-ancestors 'none'";

fn always(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

pub(crate) fn content_security_policy() -> SetResponseHeaderLayer<HeaderValue> {
    always("content-security-policy", CSP)
}

pub(crate) fn no_sniff() -> SetResponseHeaderLayer<HeaderValue> {
    always("x-content-type-options", "nosniff")
}

pub(crate) fn deny_framing() -> SetResponseHeaderLayer<HeaderValue> {
    always("x-frame-options", "DENY")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_is_valid_header_value() {
        assert!(HeaderValue::from_str(CSP).is_ok());
        assert!(CSP.contains("connect-src 'self' ws: wss:"));
        assert!(CSP.contains("frame-ancestors 'none'"));
    }
}
