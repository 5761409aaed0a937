// Capability traits at the edges of the push engine
//
// The engine never touches a concrete HTTP framework. Callers adapt their
// request to CookieSource and their response to PushTarget.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::PushCookie;

/// Something with a readable named cookie (an incoming request).
pub trait CookieSource {
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Something that can carry a `Link` header and a cookie (an outgoing response).
///
/// A rejected value must leave the target as it was.
pub trait PushTarget {
    fn set_link_header(&mut self, value: &str) -> Result<()>;

    fn add_cookie(&mut self, cookie: &PushCookie) -> Result<()>;
}

/// Fetches the bytes of an external resource for hashing.
#[async_trait]
pub trait BaseAssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl CookieSource for HashMap<String, String> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// No cookies at all, e.g. a first visit.
impl CookieSource for () {
    fn cookie(&self, _name: &str) -> Option<String> {
        None
    }
}
