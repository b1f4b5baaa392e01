use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Login screen followed by the birth-details form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
