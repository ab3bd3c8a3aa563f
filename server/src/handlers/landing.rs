use axum::response::Html;
use tracing::instrument;

pub const LANDING_PAGE: &str = r#"
    <h2>Refy Swagger is running 🎉</h2>
    <p>Open <a href="/docs">/docs</a> to view the API documentation.</p>
"#;

#[instrument]
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
