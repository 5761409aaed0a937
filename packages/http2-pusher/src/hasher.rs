//! Stable short identifiers for resources.
//!
//! In priority order a resource is identified by:
//! 1. an MD5 of the fetched bytes, for external URLs
//! 2. the embedded `id=<20 hex>` version token appended by asset bundlers
//! 3. an MD5 of the file under the public asset root
//!
//! Every identifier is truncated to [`HASH_LENGTH`] characters.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::error::{PushError, Result};
use crate::fetcher::HttpAssetFetcher;
use crate::traits::BaseAssetFetcher;

/// Length of every resource identifier.
pub const HASH_LENGTH: usize = 12;

lazy_static! {
    static ref VERSION_TOKEN_REGEX: Regex = Regex::new(r"id=([a-f0-9]{20})").unwrap();
}

/// Derives resource identifiers from content or version tokens.
#[derive(Clone)]
pub struct ResourceHasher {
    public_root: PathBuf,
    fetcher: Arc<dyn BaseAssetFetcher>,
}

impl ResourceHasher {
    /// Create a hasher resolving local paths against `public_root`.
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            fetcher: Arc::new(HttpAssetFetcher::new()),
        }
    }

    /// Replace the fetcher used for external URLs.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn BaseAssetFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Compute the identifier for a resource path.
    pub async fn hash(&self, path: &str) -> Result<String> {
        if let Some(url) = external_url(path) {
            debug!(path = %path, "Hashing external resource");
            let bytes = self.fetcher.fetch(&url).await.map_err(|e| match e {
                PushError::ResourceUnavailable { .. } => e,
                other => PushError::unavailable(path, other),
            })?;
            return Ok(content_hash(&bytes));
        }

        if let Some(token) = version_token(path) {
            debug!(path = %path, "Using embedded version token");
            return Ok(token[..HASH_LENGTH].to_string());
        }

        let file = self.resolve_local(path)?;
        debug!(path = %path, file = %file.display(), "Hashing local resource");
        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|e| PushError::unavailable(path, e))?;

        Ok(content_hash(&bytes))
    }

    /// Resolve a server-relative path against the public root.
    ///
    /// Query strings and fragments are dropped. Paths escaping the root are refused.
    fn resolve_local(&self, path: &str) -> Result<PathBuf> {
        let relative = path
            .split(['?', '#'])
            .next()
            .unwrap_or(path)
            .trim_start_matches('/');

        let escapes_root = Path::new(relative)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.is_empty() || escapes_root {
            return Err(PushError::unavailable(
                path,
                "path does not name a file under the public root",
            ));
        }

        Ok(self.public_root.join(relative))
    }
}

/// The fetchable URL of an external resource, or `None` for server-relative paths.
///
/// Protocol-relative URLs (`//host/path`) are fetched over https.
pub fn external_url(path: &str) -> Option<String> {
    if let Some(rest) = path.strip_prefix("//") {
        return (!rest.is_empty()).then(|| format!("https:{}", path));
    }

    Url::parse(path)
        .ok()
        .filter(|url| url.host_str().is_some())
        .map(|_| path.to_string())
}

/// The 20 character version token in a path's query string, if present.
pub fn version_token(path: &str) -> Option<&str> {
    let (_, query) = path.split_once('?')?;
    VERSION_TOKEN_REGEX
        .captures(query)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Truncated hex MD5 of some bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut digest = format!("{:x}", md5::compute(bytes));
    digest.truncate(HASH_LENGTH);
    digest
}
