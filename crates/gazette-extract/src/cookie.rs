//! Cookie parsing and `Set-Cookie` building.

use crate::ExtractionContext;
use http::header;
use std::collections::HashMap;
use std::fmt;

/// Cookies parsed from a request's `Cookie` header.
///
/// # Example
///
/// ```rust
/// use gazette_extract::{Cookies, ExtractionContext};
///
/// let ctx = ExtractionContext::builder()
///     .header("cookie", "sid=abc123; theme=dark")
///     .build();
///
/// let cookies = Cookies::from_request(&ctx);
/// assert_eq!(cookies.get("sid"), Some("abc123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    cookies: HashMap<String, String>,
}

impl Cookies {
    /// Parses cookies from the request's `Cookie` header.
    ///
    /// A missing or malformed header yields an empty set.
    #[must_use]
    pub fn from_request(ctx: &ExtractionContext) -> Self {
        match ctx.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            Some(value) => Self::parse(value),
            None => Self::default(),
        }
    }

    fn parse(header_value: &str) -> Self {
        let mut cookies = HashMap::new();
        for cookie in header_value.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                cookies.insert(
                    name.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }
        Self { cookies }
    }

    /// Returns a cookie value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns true when no cookies were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Builder for a `Set-Cookie` response header.
#[derive(Debug, Clone)]
pub struct SetCookie {
    name: String,
    value: String,
    path: Option<String>,
    max_age_secs: Option<u64>,
    http_only: bool,
    same_site_lax: bool,
}

impl SetCookie {
    /// Creates a new `Set-Cookie` builder.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            max_age_secs: None,
            http_only: false,
            same_site_lax: false,
        }
    }

    /// Sets the `Path` attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the `Max-Age` attribute in seconds.
    #[must_use]
    pub fn max_age_secs(mut self, seconds: u64) -> Self {
        self.max_age_secs = Some(seconds);
        self
    }

    /// Sets the `HttpOnly` attribute.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets `SameSite=Lax`.
    #[must_use]
    pub fn same_site_lax(mut self) -> Self {
        self.same_site_lax = true;
        self
    }

    /// Renders the header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(ref path) = self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(max_age) = self.max_age_secs {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        if self.same_site_lax {
            write!(f, "; SameSite=Lax")?;
        }
        Ok(())
    }
}
