//! Session cookie directives

use std::time::Duration;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Older cookie name still accepted on requests and cleared on logout
pub const LEGACY_SESSION_COOKIE: &str = "jwt";

/// SameSite attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// A `Set-Cookie` directive for the session token
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub http_only: bool,
    pub same_site: SameSite,
    pub secure: bool,
    pub max_age: Duration,
}

impl SessionCookie {
    /// Cookie holding a freshly issued token
    pub fn session(token: impl Into<String>, max_age: Duration, secure: bool) -> Self {
        Self {
            name: SESSION_COOKIE.to_string(),
            value: token.into(),
            http_only: true,
            same_site: SameSite::Strict,
            secure,
            max_age,
        }
    }

    /// Directive that clears the named cookie
    pub fn cleared(name: &str, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            http_only: true,
            same_site: SameSite::Strict,
            secure,
            max_age: Duration::ZERO,
        }
    }

    /// Render as a `Set-Cookie` header value
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out.push_str("; SameSite=");
        out.push_str(self.same_site.as_str());
        out.push_str("; Path=/");
        out.push_str(&format!("; Max-Age={}", self.max_age.as_secs()));
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("same_site", &self.same_site)
            .field("secure", &self.secure)
            .field("max_age", &self.max_age)
            .finish()
    }
}

/// Look up a cookie value in a `Cookie` request header
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then_some(value)
    })
}
