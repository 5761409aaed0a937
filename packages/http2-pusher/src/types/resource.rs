//! Pushable resource types and the normalized resource record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `as=` destination of a preload hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Style,
    Script,
    Font,
    Image,
}

/// Extension to type lookup table. Keys are lowercase and unique.
pub const EXTENSION_TABLE: &[(&str, ResourceType)] = &[
    ("css", ResourceType::Style),
    ("js", ResourceType::Script),
    ("ttf", ResourceType::Font),
    ("otf", ResourceType::Font),
    ("woff", ResourceType::Font),
    ("woff2", ResourceType::Font),
    ("eot", ResourceType::Font),
    ("jpeg", ResourceType::Image),
    ("jpg", ResourceType::Image),
    ("png", ResourceType::Image),
    ("gif", ResourceType::Image),
    ("bmp", ResourceType::Image),
    ("svg", ResourceType::Image),
];

impl ResourceType {
    /// Look up the type for a bare extension (no leading dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSION_TABLE
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, resource_type)| *resource_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Script => "script",
            Self::Font => "font",
            Self::Image => "image",
        }
    }

    /// Fonts are fetched in anonymous CORS mode, so their preload needs `crossorigin`.
    pub fn requires_crossorigin(&self) -> bool {
        matches!(self, Self::Font)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified and hashed resource.
///
/// Field order is `path`, `type`, `hash` and is part of the cookie wire
/// format: the cache digest is compared as a serialized string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    path: String,
    #[serde(rename = "type")]
    resource_type: ResourceType,
    hash: String,
}

impl ResourceRecord {
    pub fn new(
        path: impl Into<String>,
        resource_type: ResourceType,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            resource_type,
            hash: hash.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}
