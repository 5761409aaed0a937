//! Push decision orchestration.
//!
//! candidates + global pushes → filter → transform → diff against the cache
//! digest cookie → `Link` header and refreshed cookie, or nothing at all.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use tracing::{debug, info};

use crate::cache;
use crate::classifier::classify;
use crate::error::Result;
use crate::hasher::ResourceHasher;
use crate::link::build_link;
use crate::traits::CookieSource;
use crate::transformer::ResourceTransformer;
use crate::types::{Http2Push, PushCookie, PushSettings};

/// Builds the HTTP/2 push hint for a response.
///
/// Holds no per-request state and can be shared between requests.
#[derive(Clone)]
pub struct PushBuilder {
    settings: PushSettings,
    transformer: ResourceTransformer,
}

impl PushBuilder {
    pub fn new(settings: PushSettings, hasher: ResourceHasher) -> Self {
        Self {
            settings,
            transformer: ResourceTransformer::new(hasher),
        }
    }

    /// Decide what to push for `resources` given the request's cookies.
    ///
    /// Returns `Ok(None)` when no header or cookie should be emitted: nothing
    /// pushable was found, or the client's digest already covers every
    /// resource. Any hashing failure aborts the decision.
    pub async fn prepare<C, I, S>(&self, cookies: &C, resources: I) -> Result<Option<Http2Push>>
    where
        C: CookieSource + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.prepare_at(cookies, resources, Utc::now()).await
    }

    /// Same as [`prepare`](Self::prepare) with an explicit clock for the cookie expiry.
    pub async fn prepare_at<C, I, S>(
        &self,
        cookies: &C,
        resources: I,
        now: DateTime<Utc>,
    ) -> Result<Option<Http2Push>>
    where
        C: CookieSource + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates = self.filter_candidates(resources);
        if candidates.is_empty() {
            debug!("No pushable resources");
            return Ok(None);
        }

        let transformed = self.transformer.transform(&candidates).await?;
        let encoded = cache::encode(&transformed)?;

        let incoming = cookies.cookie(&self.settings.cookie_name);
        let pushable = cache::pending(&transformed, &encoded, incoming.as_deref());
        if pushable.is_empty() {
            debug!(
                resources = transformed.len(),
                "All resources already cached by client"
            );
            return Ok(None);
        }

        let link = build_link(&pushable);
        let max_age = self.settings.cookie_duration;
        let cookie = PushCookie {
            name: self.settings.cookie_name.clone(),
            value: encoded,
            expires: now
                .checked_add_signed(max_age)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            max_age,
        };

        info!(
            pushed = pushable.len(),
            total = transformed.len(),
            "Prepared HTTP/2 push"
        );

        Ok(Some(Http2Push::new(pushable, cookie, link)))
    }

    /// Merge request candidates with global pushes, keeping first-seen order
    /// and dropping unsupported extensions.
    fn filter_candidates<I, S>(&self, resources: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resources
            .into_iter()
            .map(|r| r.as_ref().to_string())
            .chain(self.settings.global_pushes.iter().cloned())
            .filter(|path| {
                let supported = classify(path).is_some();
                if !supported {
                    debug!(path = %path, "Skipping unsupported resource");
                }
                supported
            })
            .collect()
    }
}
