//! Cache digest cookie encoding and diffing.
//!
//! The digest is the JSON array of every currently pushable record. A client
//! sends back the digest it last received and only records absent from it are
//! pushed again. The cookie is always rewritten with the full current set, so
//! a resource that disappears from a page and later returns counts as uncached.

use std::collections::HashSet;
use tracing::debug;

use crate::error::Result;
use crate::types::ResourceRecord;

/// Serialize records into the canonical digest form.
///
/// Compact JSON with fields in `path`, `type`, `hash` order. The same input
/// always produces the same string.
pub fn encode(records: &[ResourceRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decode an incoming digest. Malformed values decode to `None`.
pub fn decode(raw: &str) -> Option<Vec<ResourceRecord>> {
    match serde_json::from_str(raw) {
        Ok(records) => Some(records),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed cache digest cookie");
            None
        }
    }
}

/// Records in `current` that are not structurally present in `cached`.
///
/// Order follows `current`. With no cache everything is returned.
pub fn diff(current: &[ResourceRecord], cached: Option<&[ResourceRecord]>) -> Vec<ResourceRecord> {
    let Some(cached) = cached else {
        return current.to_vec();
    };

    let seen: HashSet<&ResourceRecord> = cached.iter().collect();
    current
        .iter()
        .filter(|record| !seen.contains(record))
        .cloned()
        .collect()
}

/// Determine what still needs pushing given the encoded current set and the
/// raw incoming cookie.
///
/// An exact match with the incoming cookie yields nothing. A missing, empty or
/// malformed cookie yields everything.
pub fn pending(
    current: &[ResourceRecord],
    encoded_current: &str,
    incoming: Option<&str>,
) -> Vec<ResourceRecord> {
    let incoming = incoming.filter(|raw| !raw.is_empty());

    match incoming {
        None => current.to_vec(),
        Some(raw) if raw == encoded_current => {
            debug!("Cache digest is current");
            vec![]
        }
        Some(raw) => {
            let cached = decode(raw);
            diff(current, cached.as_deref())
        }
    }
}
