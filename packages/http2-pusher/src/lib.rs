//! HTTP/2 Server Push hints for HTML responses
//!
//! Given the resources a rendered page references, decides which of them to
//! announce with a `Link: rel=preload` header. A cache digest cookie held by
//! the client records what was already announced, so repeat visits only push
//! new or changed resources.
//!
//! # Usage
//!
//! ```rust,ignore
//! use http2_pusher::{PushBuilder, PushSettings, ResourceHasher};
//!
//! let builder = PushBuilder::new(PushSettings::default(), ResourceHasher::new("public"));
//!
//! if let Some(push) = builder.prepare(&request_cookies, ["/js/app.js", "/css/app.css"]).await? {
//!     push.apply_to(&mut response)?;
//! }
//! ```
//!
//! # Modules
//!
//! - [`classifier`] - Extension based resource typing
//! - [`hasher`] - Version token and content hash identifiers
//! - [`transformer`] - Paths to hashed resource records
//! - [`cache`] - Cache digest encoding and diffing
//! - [`link`] - `Link` header rendering
//! - [`builder`] - The push decision itself
//! - [`testing`] - Mock implementations for testing

pub mod builder;
pub mod cache;
pub mod classifier;
pub mod error;
pub mod fetcher;
pub mod hasher;
pub mod link;
pub mod testing;
pub mod traits;
pub mod transformer;
pub mod types;

pub use builder::PushBuilder;
pub use classifier::classify;
pub use error::{PushError, Result};
pub use fetcher::HttpAssetFetcher;
pub use hasher::{ResourceHasher, HASH_LENGTH};
pub use link::build_link;
pub use traits::{BaseAssetFetcher, CookieSource, PushTarget};
pub use transformer::ResourceTransformer;
pub use types::{
    parse_duration, Http2Push, PushCookie, PushSettings, ResourceRecord, ResourceType,
    DEFAULT_COOKIE_DURATION, DEFAULT_COOKIE_NAME,
};
