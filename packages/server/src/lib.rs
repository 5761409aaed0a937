// HTTP/2 Server Push - API Core
//
// Serves the public asset root and announces the resources each HTML page
// references with `Link: rel=preload` headers. Push decisions come from the
// http2-pusher crate; this crate owns the HTTP plumbing around it.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
