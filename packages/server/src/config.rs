use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use http2_pusher::{parse_duration, PushSettings, DEFAULT_COOKIE_DURATION, DEFAULT_COOKIE_NAME};
use std::env;
use std::path::PathBuf;

const DEFAULT_MANIFEST_PATH: &str = "mix-manifest.json";
const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub public_path: PathBuf,
    pub push: PushSettings,
    pub middleware: MiddlewareConfig,
}

/// What the server push middleware looks at besides the global pushes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareConfig {
    pub crawl_dom: bool,
    pub manifest: ManifestConfig,
    /// HTML bodies larger than this are not crawled
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    pub include: bool,
    /// Relative paths resolve against the public root
    pub path: PathBuf,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            crawl_dom: true,
            manifest: ManifestConfig {
                include: true,
                path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            },
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cookie_duration = get("PUSH_COOKIE_DURATION")
            .unwrap_or_else(|| DEFAULT_COOKIE_DURATION.to_string());

        let push = PushSettings::new()
            .with_cookie_name(
                get("PUSH_COOKIE_NAME").unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            )
            .with_cookie_duration(
                parse_duration(&cookie_duration)
                    .context("PUSH_COOKIE_DURATION must be a relative time like '60 days'")?,
            )
            .with_global_pushes(
                get("PUSH_GLOBAL")
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty()),
            );

        let defaults = MiddlewareConfig::default();
        let middleware = MiddlewareConfig {
            crawl_dom: flag(&get, "PUSH_CRAWL_DOM", defaults.crawl_dom)?,
            manifest: ManifestConfig {
                include: flag(&get, "PUSH_MANIFEST_INCLUDE", defaults.manifest.include)?,
                path: get("PUSH_MANIFEST_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.manifest.path),
            },
            max_body_bytes: get("PUSH_MAX_BODY_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("PUSH_MAX_BODY_BYTES must be a number of bytes")?
                .unwrap_or(defaults.max_body_bytes),
        };

        Ok(Self {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            public_path: get("PUBLIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./public")),
            push,
            middleware,
        })
    }

    /// Location of the build manifest
    pub fn manifest_file(&self) -> PathBuf {
        self.public_path.join(&self.middleware.manifest.path)
    }
}

fn flag(get: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    let Some(raw) = get(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{} must be a boolean, got '{}'", key, raw),
    }
}
