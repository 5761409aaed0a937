//! Maps resource paths to pushable types.

use crate::types::ResourceType;

/// Return the extension of a path or URL with any query string and fragment removed.
///
/// Only the last path segment is considered, so dots in directory names or
/// hostnames never count as an extension.
pub fn extension(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = file_name.rsplit_once('.')?;

    if stem.is_empty() || ext.is_empty() {
        return None;
    }

    Some(ext)
}

/// Classify a resource path, or `None` if its extension is not pushable.
pub fn classify(path: &str) -> Option<ResourceType> {
    extension(path).and_then(ResourceType::from_extension)
}
