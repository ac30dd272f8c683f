//! services/api/src/web/page.rs
//!
//! Serves the single-page form the teacher works in.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET / - the lesson plan assistant page.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
