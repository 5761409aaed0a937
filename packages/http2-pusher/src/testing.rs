//! Testing utilities including mock implementations.
//!
//! Useful for exercising the push engine without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{PushError, Result};
use crate::traits::{BaseAssetFetcher, PushTarget};
use crate::types::PushCookie;

/// A mock fetcher returning canned bodies by URL.
///
/// URLs without a canned body fail with `ResourceUnavailable`.
#[derive(Default)]
pub struct MockAssetFetcher {
    bodies: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned body for a URL.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.write().unwrap().insert(url.into(), body.into());
        self
    }

    /// Replace the body served for a URL.
    pub fn set_body(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.write().unwrap().insert(url.into(), body.into());
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl BaseAssetFetcher for MockAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.write().unwrap().push(url.to_string());

        self.bodies
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| PushError::unavailable(url, "no mock body registered"))
    }
}

/// A response stand-in that records what a push attached to it.
#[derive(Debug, Default, Clone)]
pub struct RecordingTarget {
    pub link: Option<String>,
    pub cookies: Vec<PushCookie>,
}

impl PushTarget for RecordingTarget {
    fn set_link_header(&mut self, value: &str) -> Result<()> {
        self.link = Some(value.to_string());
        Ok(())
    }

    fn add_cookie(&mut self, cookie: &PushCookie) -> Result<()> {
        self.cookies.push(cookie.clone());
        Ok(())
    }
}
