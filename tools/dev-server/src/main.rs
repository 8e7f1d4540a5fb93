//! Development Server for the quiz page runtime
//!
//! Serves the demo page and the wasm-pack output with correct MIME types
//! and caching disabled, so rebuilt modules are picked up on reload.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::get_service,
    Router,
};
use std::net::SocketAddr;
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let root = std::env::var("WEB_ROOT").unwrap_or_else(|_| "web".to_string());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let serve_dir = ServeDir::new(&root).append_index_html_on_directories(true);

    let app = Router::new()
        .fallback_service(get_service(serve_dir).handle_error(|_| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .layer(axum::middleware::from_fn(add_headers));

    println!("╔═══════════════════════════════════════════════════╗");
    println!("║           Quiz Page Runtime Dev Server            ║");
    println!("╠═══════════════════════════════════════════════════╣");
    println!("║  URL:  http://localhost:{:<26}║", port);
    println!("║  Root: {:<43}║", root);
    println!("║  Press Ctrl+C to stop                             ║");
    println!("╚═══════════════════════════════════════════════════╝");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Disable caching and fix MIME types
async fn add_headers(request: Request<Body>, next: axum::middleware::Next) -> Response<Body> {
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    if let Some(content_type) = content_type_for(&path) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    response
}

/// Content type for module scripts and wasm, which some platforms misreport
fn content_type_for(path: &str) -> Option<&'static str> {
    if path.ends_with(".js") || path.ends_with(".mjs") {
        Some("application/javascript; charset=utf-8")
    } else if path.ends_with(".wasm") {
        Some("application/wasm")
    } else if path.ends_with(".css") {
        Some("text/css; charset=utf-8")
    } else if path.ends_with(".html") {
        Some("text/html; charset=utf-8")
    } else if path.ends_with(".json") {
        Some("application/json; charset=utf-8")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("/pkg/quiz_loader_bg.wasm"), Some("application/wasm"));
        assert_eq!(
            content_type_for("/pkg/quiz_loader.js"),
            Some("application/javascript; charset=utf-8")
        );
        assert_eq!(content_type_for("/"), None);
    }
}
