//! Build manifest reader.
//!
//! Asset bundlers write a JSON object mapping source names to versioned URLs,
//! e.g. `{"/js/app.js": "/js/app.js?id=8e38929b2d5501e6808e"}`. The values are
//! push candidates.

use indexmap::IndexMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Read the manifest's values in file order. A missing or malformed manifest yields nothing.
pub async fn read_manifest(path: &Path) -> Vec<String> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No build manifest");
            return vec![];
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read build manifest");
            return vec![];
        }
    };

    parse_manifest(&contents).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Malformed build manifest");
        vec![]
    })
}

/// Extract the string values of a manifest object.
pub fn parse_manifest(contents: &str) -> serde_json::Result<Vec<String>> {
    let entries: IndexMap<String, serde_json::Value> = serde_json::from_str(contents)?;

    Ok(entries
        .into_values()
        .filter_map(|value| value.as_str().map(String::from))
        .collect())
}
