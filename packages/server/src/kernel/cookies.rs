//! Cookie transport between axum headers and the push engine.

use axum::http::{
    header::{COOKIE, LINK, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use http2_pusher::{CookieSource, PushCookie, PushError, PushTarget, Result};

/// Request cookies read from `Cookie` headers.
pub struct RequestCookies<'a>(pub &'a HeaderMap);

impl CookieSource for RequestCookies<'_> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.0
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| urlencoding::decode(value.trim()).ok())
            .map(|value| value.into_owned())
    }
}

/// Response headers receiving the `Link` header and digest cookie.
pub struct ResponseHeaders<'a>(pub &'a mut HeaderMap);

impl PushTarget for ResponseHeaders<'_> {
    fn set_link_header(&mut self, value: &str) -> Result<()> {
        // Keep preload hints set by the handler itself
        let combined = match self.0.get(LINK).and_then(|v| v.to_str().ok()) {
            Some(existing) if !existing.is_empty() => format!("{},{}", existing, value),
            _ => value.to_string(),
        };

        let header = header_value("link", &combined)?;
        self.0.insert(LINK, header);
        Ok(())
    }

    fn add_cookie(&mut self, cookie: &PushCookie) -> Result<()> {
        let header = header_value("set-cookie", &set_cookie_header(cookie))?;
        self.0.append(SET_COOKIE, header);
        Ok(())
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| PushError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Render a `Set-Cookie` header value. The JSON digest is percent-encoded.
pub fn set_cookie_header(cookie: &PushCookie) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; Expires={}; HttpOnly; SameSite=Lax",
        cookie.name,
        urlencoding::encode(&cookie.value),
        cookie.max_age.num_seconds().max(0),
        cookie.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
    )
}
