//! Session Cookie Handling
//!
//! Building and reading the session cookie that carries the signed session token.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Session cookie settings. Always `HttpOnly` and `Path=/`.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    /// Only sent over HTTPS (production)
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            name: "sid".to_string(),
            secure: true,
            same_site: SameSite::Lax,
        }
    }
}

impl SessionCookie {
    /// `Set-Cookie` value carrying `token` for `max_age_secs`.
    pub fn issue(&self, token: &str, max_age_secs: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; Path=/; Max-Age={}",
            self.name, token, max_age_secs
        );
        self.push_attributes(&mut cookie);
        cookie
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    pub fn clear(&self) -> String {
        let mut cookie = format!(
            "{}=; HttpOnly; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.name
        );
        self.push_attributes(&mut cookie);
        cookie
    }

    /// Read this cookie from a request.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.name)
    }

    /// `issue` as a header value; an unrepresentable token yields an empty cookie.
    pub fn issue_header(&self, token: &str, max_age_secs: u64) -> HeaderValue {
        HeaderValue::from_str(&self.issue(token, max_age_secs))
            .unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=");
        cookie.push_str(self.same_site.as_str());
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}
