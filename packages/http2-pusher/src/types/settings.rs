//! Push configuration supplied by the caller.

use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{PushError, Result};

pub const DEFAULT_COOKIE_NAME: &str = "h2_cache-digest";
pub const DEFAULT_COOKIE_DURATION: &str = "60 days";

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(r"^\+?\s*(\d+)\s*([a-z]+)$").unwrap();
}

/// Settings for one push decision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushSettings {
    /// Name of the cache digest cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Lifetime of the cache digest cookie. Deserialized from strings such as `"60 days"`.
    #[serde(
        default = "default_cookie_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub cookie_duration: Duration,

    /// Resources pushed on every page in addition to the discovered ones.
    #[serde(default)]
    pub global_pushes: Vec<String>,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_duration: default_cookie_duration(),
            global_pushes: vec![],
        }
    }
}

impl PushSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the cookie lifetime.
    pub fn with_cookie_duration(mut self, duration: Duration) -> Self {
        self.cookie_duration = duration;
        self
    }

    /// Set the resources pushed on every page.
    pub fn with_global_pushes(
        mut self,
        pushes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.global_pushes = pushes.into_iter().map(|p| p.into()).collect();
        self
    }
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_cookie_duration() -> Duration {
    Duration::days(60)
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Parse a relative duration such as `"60 days"`, `"+2 weeks"` or `"90m"`.
///
/// Months count as 30 days and years as 365 days.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let normalized = input.trim().to_ascii_lowercase();
    let invalid = || PushError::InvalidDuration(input.to_string());

    let captures = DURATION_REGEX.captures(&normalized).ok_or_else(invalid)?;
    let amount: i64 = captures[1].parse().map_err(|_| invalid())?;

    let unit_seconds: i64 = match &captures[2] {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 7 * 86_400,
        "month" | "months" => 30 * 86_400,
        "y" | "year" | "years" => 365 * 86_400,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(unit_seconds)
        .and_then(Duration::try_seconds)
        .ok_or_else(invalid)
}
