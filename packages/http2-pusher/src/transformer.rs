//! Turns raw candidate paths into classified, hashed resource records.

use futures::future::try_join_all;
use indexmap::IndexSet;

use crate::classifier::classify;
use crate::error::{PushError, Result};
use crate::hasher::ResourceHasher;
use crate::types::ResourceRecord;

/// Combines classification and hashing.
#[derive(Clone)]
pub struct ResourceTransformer {
    hasher: ResourceHasher,
}

impl ResourceTransformer {
    pub fn new(hasher: ResourceHasher) -> Self {
        Self { hasher }
    }

    /// Transform paths into records, preserving first-seen order.
    ///
    /// Duplicate paths are hashed once. Paths without a pushable type are
    /// skipped. Hashes are computed concurrently; the first failure aborts
    /// the whole transform.
    pub async fn transform<I, S>(&self, paths: I) -> Result<Vec<ResourceRecord>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: IndexSet<String> = paths
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        let pending = unique.into_iter().filter_map(|path| {
            let resource_type = classify(&path)?;
            Some(async move {
                let hash = self.hasher.hash(&path).await?;
                Ok::<_, PushError>(ResourceRecord::new(path, resource_type, hash))
            })
        });

        try_join_all(pending).await
    }
}
