//! Server push middleware driven through the full router.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use futures::stream;
use http2_pusher::testing::MockAssetFetcher;
use http2_pusher::{PushBuilder, ResourceHasher};
use push_server::server::{
    build_app_with_state,
    middleware::{server_push, PushState},
};
use push_server::Config;
use tempfile::TempDir;
use tower::ServiceExt;

const CDN_SCRIPT: &str = "https://cdn.example.com/libs/bootstrap.min.js";

const MIX_MANIFEST: &str = r#"{
    "/js/vendor.js": "/js/vendor.js?id=911084212bac1b5ea2a5",
    "/js/app.js": "/js/app.js?id=8e38929b2d5501e6808e",
    "/css/app.css": "/css/app.css?id=516707d9f36d4fb7d866",
    "/js/manifest.js": "/js/manifest.js?id=ac5def271276f7bf7ec1"
}"#;

struct TestApp {
    _public: TempDir,
    router: Router,
}

impl TestApp {
    fn new(files: &[(&str, String)]) -> Self {
        Self::with_vars(files, &[])
    }

    fn with_vars(files: &[(&str, String)], vars: &[(&str, &str)]) -> Self {
        Self::build(files, vars, None)
    }

    /// Serve a single handler behind the push middleware instead of the static files.
    fn with_route(vars: &[(&str, &str)], path: &str, route: MethodRouter) -> Self {
        Self::build(&assets(), vars, Some((path, route)))
    }

    fn build(
        files: &[(&str, String)],
        vars: &[(&str, &str)],
        route: Option<(&str, MethodRouter)>,
    ) -> Self {
        let public = tempfile::tempdir().unwrap();
        for (path, contents) in files {
            let file = public.path().join(path);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, contents).unwrap();
        }

        let root = public.path().to_string_lossy().into_owned();
        let config = Config::from_source(|key| {
            if key == "PUBLIC_PATH" {
                return Some(root.clone());
            }
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap();

        let fetcher = Arc::new(MockAssetFetcher::new().with_body(CDN_SCRIPT, "remote"));
        let hasher = ResourceHasher::new(config.public_path.clone()).with_fetcher(fetcher);
        let state = PushState::new(
            PushBuilder::new(config.push.clone(), hasher),
            config.middleware.clone(),
            config.manifest_file(),
        );

        let router = match route {
            Some((path, route)) => Router::new()
                .route(path, route)
                .layer(middleware::from_fn_with_state(state, server_push)),
            None => build_app_with_state(&config, state),
        };

        Self {
            _public: public,
            router,
        }
    }

    async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Response {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

fn link(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LINK)
        .map(|v| v.to_str().unwrap().to_string())
}

/// The `name=value` pair of the first `Set-Cookie` header, as a browser would send it back.
fn returned_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(String::from)
}

fn page(body: &str) -> String {
    format!("<!doctype html><html><head><title>Test</title></head><body>{}</body></html>", body)
}

fn assets() -> Vec<(&'static str, String)> {
    [
        ("js/app.js", "console.log('app');"),
        ("css/app.css", "body { margin: 0 }"),
        ("images/chrome.svg", "<svg></svg>"),
        ("images/github.png", "png"),
        ("images/laravel.jpg", "jpg"),
    ]
    .into_iter()
    .map(|(path, contents)| (path, contents.to_string()))
    .collect()
}

#[tokio::test]
async fn page_without_resources_gets_no_link_or_cookie() {
    let mut files = assets();
    let html = page("<h1>Hello</h1>");
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let response = app.get("/", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(link(&response).is_none());
    assert!(returned_cookie(&response).is_none());
}

#[tokio::test]
async fn crawls_scripts_and_pushes_them() {
    let mut files = assets();
    let html = page(&format!(
        r#"<script src="/js/app.js"></script><script src="{}"></script>"#,
        CDN_SCRIPT
    ));
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let response = app.get("/", &[]).await;

    let link = link(&response).unwrap();
    assert!(link.contains("</js/app.js>"));
    assert!(link.contains(CDN_SCRIPT));
    assert!(link.ends_with("as=script"));
    assert_eq!(link.split(',').count(), 2);

    let cookie = returned_cookie(&response).unwrap();
    assert!(cookie.starts_with("h2_cache-digest="));
}

#[tokio::test]
async fn crawls_styles_and_images() {
    let mut files = assets();
    let html = page(
        r#"<link rel="stylesheet" href="/css/app.css">
           <link rel="canonical" href="/about">
           <img src="/images/chrome.svg"><img src="/images/github.png"><img src="/images/laravel.jpg">"#,
    );
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let link = link(&app.get("/", &[]).await).unwrap();

    assert_eq!(
        link,
        "</css/app.css>; rel=preload; as=style,\
         </images/chrome.svg>; rel=preload; as=image,\
         </images/github.png>; rel=preload; as=image,\
         </images/laravel.jpg>; rel=preload; as=image"
    );
}

#[tokio::test]
async fn returned_cookie_suppresses_the_next_push() {
    let mut files = assets();
    let html = page(r#"<script src="/js/app.js"></script><link rel="stylesheet" href="/css/app.css">"#);
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let first = app.get("/", &[]).await;
    let cookie = returned_cookie(&first).unwrap();

    let second = app.get("/", &[("cookie", cookie.as_str())]).await;

    assert_eq!(second.status(), StatusCode::OK);
    assert!(link(&second).is_none());
    assert!(returned_cookie(&second).is_none());
}

#[tokio::test]
async fn pushes_the_manifest_without_duplicating_crawled_entries() {
    let mut files = assets();
    let html = page(
        r#"<link rel="stylesheet" href="/css/app.css?id=516707d9f36d4fb7d866">
           <script src="/js/app.js?id=8e38929b2d5501e6808e"></script>
           <img src="/images/chrome.svg"><img src="/images/github.png">"#,
    );
    files.push(("index.html", html.clone()));
    files.push(("mix-manifest.json", MIX_MANIFEST.to_string()));
    let app = TestApp::new(&files);

    let link = link(&app.get("/", &[]).await).unwrap();

    assert!(link.contains("style"));
    assert!(link.contains("script"));
    assert_eq!(link.split(',').count(), 6);
}

#[tokio::test]
async fn manifest_alone_is_pushed() {
    let mut files = assets();
    let html = page("<h1>Hello</h1>");
    files.push(("index.html", html.clone()));
    files.push(("mix-manifest.json", MIX_MANIFEST.to_string()));
    let app = TestApp::new(&files);

    let link = link(&app.get("/", &[]).await).unwrap();

    assert!(!link.contains("image"));
    assert_eq!(link.split(',').count(), 4);
}

#[tokio::test]
async fn disabled_sources_are_not_consulted() {
    let mut files = assets();
    let html = page(r#"<script src="/js/app.js"></script>"#);
    files.push(("index.html", html.clone()));
    files.push(("mix-manifest.json", MIX_MANIFEST.to_string()));
    let app = TestApp::with_vars(
        &files,
        &[
            ("PUSH_CRAWL_DOM", "false"),
            ("PUSH_MANIFEST_INCLUDE", "false"),
            ("PUSH_GLOBAL", "/images/laravel.jpg"),
        ],
    );

    let link = link(&app.get("/", &[]).await).unwrap();

    assert_eq!(link, "</images/laravel.jpg>; rel=preload; as=image");
}

#[tokio::test]
async fn json_and_ajax_requests_are_skipped() {
    let mut files = assets();
    let html = page(r#"<script src="/js/app.js"></script>"#);
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let json = app.get("/", &[("accept", "application/json")]).await;
    assert!(link(&json).is_none());

    let ajax = app.get("/", &[("x-requested-with", "XMLHttpRequest")]).await;
    assert!(link(&ajax).is_none());
}

#[tokio::test]
async fn non_html_responses_are_skipped() {
    let app = TestApp::with_vars(&assets(), &[("PUSH_GLOBAL", "/js/app.js")]);

    let response = app.get("/css/app.css", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(link(&response).is_none());
}

#[tokio::test]
async fn redirects_are_skipped() {
    let mut files = assets();
    let html = page(r#"<script src="/js/app.js"></script>"#);
    files.push(("docs/index.html", html));
    let app = TestApp::with_vars(&files, &[("PUSH_GLOBAL", "/js/app.js")]);

    let response = app.get("/docs", &[]).await;

    assert!(response.status().is_redirection());
    assert!(link(&response).is_none());
}

#[tokio::test]
async fn failed_push_leaves_the_page_untouched() {
    let mut files = assets();
    let html = page(r#"<script src="/js/app.js"></script><script src="/js/missing.js"></script>"#);
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let response = app.get("/", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(link(&response).is_none());
    assert!(returned_cookie(&response).is_none());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, html.as_bytes());
}

#[tokio::test]
async fn pushed_page_body_is_unchanged() {
    let mut files = assets();
    let html = page(r#"<script src="/js/app.js"></script>"#);
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let response = app.get("/", &[]).await;
    assert!(link(&response).is_some());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, html.as_bytes());
}

#[tokio::test]
async fn health_reports_public_root() {
    let app = TestApp::new(&assets());

    let response = app.get("/health", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(link(&response).is_none());
}

#[tokio::test]
async fn unencodable_link_header_sends_neither_link_nor_cookie() {
    let mut files = assets();
    let html = page(
        r#"<script src="/js/app.js"></script><script src="/js/a&#10;b.js?id=911084212bac1b5ea2a5"></script>"#,
    );
    files.push(("index.html", html.clone()));
    let app = TestApp::new(&files);

    let response = app.get("/", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(link(&response).is_none());
    assert!(returned_cookie(&response).is_none());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, html.as_bytes());
}

/// An HTML response streamed in chunks, without a `Content-Length`.
fn streamed_page(chunks: Vec<Result<String, std::io::Error>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(stream::iter(chunks)),
    )
        .into_response()
}

fn chunks_of(html: &str) -> Vec<Result<String, std::io::Error>> {
    html.as_bytes()
        .chunks(16)
        .map(|chunk| Ok(String::from_utf8_lossy(chunk).into_owned()))
        .collect()
}

#[tokio::test]
async fn streamed_page_without_length_is_crawled() {
    let html = page(r#"<script src="/js/app.js"></script>"#);
    let served = html.clone();
    let app = TestApp::with_route(
        &[],
        "/stream",
        get(move || {
            let html = served.clone();
            async move { streamed_page(chunks_of(&html)) }
        }),
    );

    let response = app.get("/stream", &[]).await;

    assert_eq!(
        link(&response).as_deref(),
        Some("</js/app.js>; rel=preload; as=script")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, html.as_bytes());
}

#[tokio::test]
async fn streamed_page_over_the_limit_is_not_crawled_but_kept_whole() {
    let html = page(r#"<script src="/js/app.js"></script>"#);
    let served = html.clone();
    let app = TestApp::with_route(
        &[("PUSH_MAX_BODY_BYTES", "32"), ("PUSH_GLOBAL", "/css/app.css")],
        "/stream",
        get(move || {
            let html = served.clone();
            async move { streamed_page(chunks_of(&html)) }
        }),
    );

    let response = app.get("/stream", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        link(&response).as_deref(),
        Some("</css/app.css>; rel=preload; as=style")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, html.as_bytes());
}

#[tokio::test]
async fn failing_body_is_passed_through_without_push() {
    let html = page(r#"<script src="/js/app.js"></script>"#);
    let app = TestApp::with_route(
        &[("PUSH_GLOBAL", "/css/app.css")],
        "/broken",
        get(move || {
            let html = html.clone();
            async move {
                streamed_page(vec![
                    Ok(html),
                    Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "upstream closed",
                    )),
                ])
            }
        }),
    );

    let response = app.get("/broken", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(link(&response).is_none());
    assert!(returned_cookie(&response).is_none());
    assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
}
