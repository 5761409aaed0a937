//! Kernel module - collaborators the push middleware depends on.

pub mod cookies;
pub mod dom_crawler;
pub mod manifest;

pub use cookies::{set_cookie_header, RequestCookies, ResponseHeaders};
pub use dom_crawler::linkable_resources;
pub use manifest::read_manifest;
