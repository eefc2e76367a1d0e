//! Security headers middleware
//!
//! Adds common security headers to every response.

use crate::{Request, Response};
use super::Middleware;

/// Security configuration
#[derive(Clone)]
pub struct SecurityConfig {
    /// Content-Security-Policy
    pub csp: Option<String>,
    /// X-Frame-Options
    pub frame_options: FrameOptions,
    /// X-Content-Type-Options
    pub content_type_options: bool,
    /// X-XSS-Protection
    pub xss_protection: bool,
    /// Referrer-Policy
    pub referrer_policy: Option<String>,
    /// Permissions-Policy
    pub permissions_policy: Option<String>,
}

/// X-Frame-Options value
#[derive(Clone)]
pub enum FrameOptions {
    Deny,
    SameOrigin,
    None,
}

impl FrameOptions {
    pub fn as_header_value(&self) -> Option<&'static str> {
        match self {
            FrameOptions::Deny => Some("DENY"),
            FrameOptions::SameOrigin => Some("SAMEORIGIN"),
            FrameOptions::None => None,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            csp: None,
            frame_options: FrameOptions::Deny,
            content_type_options: true,
            xss_protection: true,
            referrer_policy: Some("strict-origin-when-cross-origin".to_string()),
            permissions_policy: None,
        }
    }
}

impl SecurityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers served by the game pages: same-origin scripts and styles only
    pub fn arena() -> Self {
        Self {
            csp: Some(
                "default-src 'self'; img-src 'self' data:; script-src 'self'; style-src 'self';"
                    .to_string(),
            ),
            frame_options: FrameOptions::Deny,
            content_type_options: true,
            xss_protection: true,
            referrer_policy: Some("no-referrer-when-downgrade".to_string()),
            permissions_policy: Some("geolocation=(self), microphone=(), camera=()".to_string()),
        }
    }
}

/// Security middleware
pub struct Security {
    config: SecurityConfig,
}

impl Security {
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    pub fn arena() -> Self {
        Self::new(SecurityConfig::arena())
    }
}

impl Default for Security {
    fn default() -> Self {
        Self::new(SecurityConfig::default())
    }
}

impl Middleware for Security {
    fn before(&self, _req: &mut Request) -> Option<Response> {
        None
    }

    fn after(&self, _req: &Request, res: &mut Response) {
        if self.config.content_type_options {
            res.set_header("X-Content-Type-Options", "nosniff");
        }

        if let Some(value) = self.config.frame_options.as_header_value() {
            res.set_header("X-Frame-Options", value);
        }

        if self.config.xss_protection {
            res.set_header("X-XSS-Protection", "1; mode=block");
        }

        if let Some(ref policy) = self.config.referrer_policy {
            res.set_header("Referrer-Policy", policy.clone());
        }

        if let Some(ref policy) = self.config.permissions_policy {
            res.set_header("Permissions-Policy", policy.clone());
        }

        if let Some(ref csp) = self.config.csp {
            res.set_header("Content-Security-Policy", csp.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, RequestBuilder};

    #[test]
    fn test_frame_options() {
        assert_eq!(FrameOptions::Deny.as_header_value(), Some("DENY"));
        assert_eq!(FrameOptions::SameOrigin.as_header_value(), Some("SAMEORIGIN"));
        assert_eq!(FrameOptions::None.as_header_value(), None);
    }

    #[test]
    fn test_arena_headers() {
        let security = Security::arena();
        let req = RequestBuilder::new(Method::Get, "/").build();
        let mut res = Response::html("<p>hi</p>");
        security.after(&req, &mut res);

        assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(res.header("x-frame-options"), Some("DENY"));
        assert_eq!(res.header("x-xss-protection"), Some("1; mode=block"));
        assert_eq!(res.header("referrer-policy"), Some("no-referrer-when-downgrade"));
        assert_eq!(
            res.header("permissions-policy"),
            Some("geolocation=(self), microphone=(), camera=()")
        );
        assert_eq!(
            res.header("content-security-policy"),
            Some("default-src 'self'; img-src 'self' data:; script-src 'self'; style-src 'self';")
        );
    }

    #[test]
    fn test_error_response_not_duplicated() {
        let security = Security::arena();
        let req = RequestBuilder::new(Method::Get, "/").build();
        let mut res = Response::bad_request("nope");
        security.after(&req, &mut res);

        let count = res
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("x-content-type-options"))
            .count();
        assert_eq!(count, 1);
    }
}
