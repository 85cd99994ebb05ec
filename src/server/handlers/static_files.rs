//! Static page serving.

use axum::response::Html;

use super::super::assets;

/// Serve the web console.
pub async fn console() -> Html<&'static str> {
    Html(assets::CONSOLE_HTML)
}
