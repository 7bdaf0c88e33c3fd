//! Page shell and the configuration error page.
//!
//! The browser app does its own routing; every client-side route gets the
//! same `index.html`, everything else under `STATIC_DIR` is served as-is.

use std::path::Path;

use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Json, Response};
use tower_http::services::{ServeDir, ServeFile};

/// Client-side routes of the single-page app.
pub const PAGES: [&str; 8] = ["/", "/about", "/contact", "/terms", "/privacy", "/auth", "/dashboard", "/gallery"];

pub fn page_routes(static_dir: &Path) -> Router {
    let index = static_dir.join("index.html");
    let mut router = Router::new();
    for page in PAGES {
        router = router.route_service(page, ServeFile::new(&index));
    }
    router.fallback_service(ServeDir::new(static_dir))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn config_error_html(keys: &[String]) -> String {
    let items: String = keys
        .iter()
        .map(|k| format!("<li><code>{}</code></li>", escape_html(k)))
        .collect();
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Configuration Error</title></head>
<body>
<main>
<h1>Configuration Error</h1>
<p>The application is missing one or more required environment variables. Please configure them to proceed.</p>
<h2>Missing Environment Variables:</h2>
<ul>{items}</ul>
<h3>How to fix</h3>
<ul>
<li><code>LLM_API_KEY</code>: your Gemini or OpenAI API key.</li>
<li><code>SUPABASE_URL</code>: your Supabase project URL.</li>
<li><code>SUPABASE_ANON_KEY</code>: your Supabase project anon key.</li>
</ul>
</main>
</body>
</html>
"#
    )
}

/// 503 for any request while configuration is incomplete: JSON for API
/// paths, the HTML page otherwise.
pub(crate) fn config_error_response(uri: &Uri, keys: &[String]) -> Response {
    if uri.path().starts_with("/api/") {
        let body = serde_json::json!({ "error": "Configuration Error", "missing": keys });
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }
    (StatusCode::SERVICE_UNAVAILABLE, Html(config_error_html(keys))).into_response()
}
