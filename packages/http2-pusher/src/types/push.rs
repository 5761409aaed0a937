//! The outcome of a push decision.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::traits::PushTarget;
use crate::types::resource::ResourceRecord;

/// The refreshed cache digest cookie.
///
/// `value` is the raw JSON digest; transport encoding is up to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCookie {
    pub name: String,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub max_age: Duration,
}

/// Resources to push, the `Link` header value announcing them, and the cookie
/// recording the full current resource set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Http2Push {
    resources: Vec<ResourceRecord>,
    cookie: PushCookie,
    link: String,
}

impl Http2Push {
    pub fn new(resources: Vec<ResourceRecord>, cookie: PushCookie, link: String) -> Self {
        Self {
            resources,
            cookie,
            link,
        }
    }

    /// The subset of resources actually pushed.
    pub fn resources(&self) -> &[ResourceRecord] {
        &self.resources
    }

    pub fn cookie(&self) -> &PushCookie {
        &self.cookie
    }

    /// The `Link` header value.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Attach the `Link` header and the cache digest cookie to a response.
    ///
    /// The cookie is only added once the header has been accepted, so a
    /// client is never told about resources it was not sent.
    pub fn apply_to<T: PushTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        target.set_link_header(&self.link)?;
        target.add_cookie(&self.cookie)
    }
}
