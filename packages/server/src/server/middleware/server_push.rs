use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{
        header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use futures::{stream, StreamExt};
use http2_pusher::PushBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::MiddlewareConfig;
use crate::kernel::{linkable_resources, read_manifest, RequestCookies, ResponseHeaders};

/// Shared state for the server push middleware
#[derive(Clone)]
pub struct PushState {
    pub builder: Arc<PushBuilder>,
    pub middleware: MiddlewareConfig,
    pub manifest_file: PathBuf,
}

impl PushState {
    pub fn new(builder: PushBuilder, middleware: MiddlewareConfig, manifest_file: PathBuf) -> Self {
        Self {
            builder: Arc::new(builder),
            middleware,
            manifest_file,
        }
    }
}

/// Server push middleware
///
/// Adds a `Link: rel=preload` header and a cache digest cookie to HTML
/// responses. Redirects, JSON and XHR requests are passed through untouched,
/// as is any response whose push decision fails.
pub async fn server_push(State(state): State<PushState>, request: Request, next: Next) -> Response {
    let skip = wants_json(request.headers()) || is_ajax(request.headers());

    // Only the cookies are needed once the request has been handed on
    let cookies: HeaderMap = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .map(|value| (COOKIE, value.clone()))
        .collect();

    let response = next.run(request).await;

    if skip || response.status().is_redirection() || !is_html(response.headers()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let mut candidates = Vec::new();

    let body = if state.middleware.crawl_dom && fits(&parts.headers, state.middleware.max_body_bytes)
    {
        match buffer_body(body, state.middleware.max_body_bytes).await {
            Buffered::Complete(bytes) => {
                candidates.extend(linkable_resources(&String::from_utf8_lossy(&bytes)));
                Body::from(bytes)
            }
            Buffered::TooLarge(body) => {
                debug!(
                    limit = state.middleware.max_body_bytes,
                    "Response body too large to crawl"
                );
                body
            }
            Buffered::Failed(body) => return Response::from_parts(parts, body),
        }
    } else {
        body
    };

    if state.middleware.manifest.include {
        candidates.extend(read_manifest(&state.manifest_file).await);
    }

    let mut response = Response::from_parts(parts, body);

    match state
        .builder
        .prepare(&RequestCookies(&cookies), &candidates)
        .await
    {
        Ok(Some(push)) => {
            // Header and cookie go on together or not at all
            let mut headers = response.headers().clone();
            match push.apply_to(&mut ResponseHeaders(&mut headers)) {
                Ok(()) => *response.headers_mut() = headers,
                Err(e) => warn!(error = %e, "Skipping server push"),
            }
        }
        Ok(None) => debug!("Nothing to push"),
        Err(e) => warn!(error = %e, "Skipping server push"),
    }

    response
}

/// A response body read as far as the crawl limit allows.
///
/// Bodies that were not fully read are rebuilt from the chunks already taken
/// followed by whatever the original stream still yields.
enum Buffered {
    Complete(Bytes),
    TooLarge(Body),
    Failed(Body),
}

async fn buffer_body(body: Body, limit: usize) -> Buffered {
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut read = 0usize;
    let mut data = body.into_data_stream();

    while let Some(chunk) = data.next().await {
        match chunk {
            Ok(chunk) => {
                read += chunk.len();
                chunks.push(chunk);
                if read > limit {
                    let taken = stream::iter(chunks.into_iter().map(Ok::<_, axum::Error>));
                    return Buffered::TooLarge(Body::from_stream(taken.chain(data)));
                }
            }
            Err(e) => {
                warn!(error = %e, read, "Response body failed while buffering, skipping server push");
                let replay = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(e)));
                return Buffered::Failed(Body::from_stream(stream::iter(replay)));
            }
        }
    }

    Buffered::Complete(chunks.concat().into())
}

fn wants_json(headers: &HeaderMap) -> bool {
    [CONTENT_TYPE, ACCEPT].iter().any(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("/json") || v.contains("+json"))
            .unwrap_or(false)
    })
}

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("text/html"))
        .unwrap_or(false)
}

/// Bodies without a declared length are buffered regardless of size.
fn fits(headers: &HeaderMap, max_body_bytes: usize) -> bool {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .map(|len| len <= max_body_bytes)
        .unwrap_or(true)
}
