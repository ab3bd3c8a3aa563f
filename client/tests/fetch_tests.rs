use refy_docs_client::{
    CheckCommand, DocsClient, DocsClientArgs, DocsClientError, DocumentSource, RetrySettings,
};
use axum::{Router, http::StatusCode, routing::get};
use reqwest::Url;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;
use uuid::Uuid;

async fn serve(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

async fn start_docs_server() -> Url {
    serve(refy_docs_server::server::build_router()).await
}

// Answers every document request with `status` and counts the attempts.
async fn start_failing_server(status: StatusCode, body: &'static str) -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    );

    (serve(router).await, hits)
}

fn client(base_url: Url) -> DocsClient {
    DocsClient::new(DocsClientArgs {
        base_url,
        correlation_id: Uuid::new_v4(),
    })
    .unwrap()
    .with_retry_settings(RetrySettings {
        max_retries: 2,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        ..RetrySettings::default()
    })
}

#[tokio::test]
async fn fetched_document_matches_built_in_contract() {
    // Arrange
    let base_url = start_docs_server().await;

    // Act
    let document = client(base_url).fetch_document().await.unwrap();

    // Assert
    assert_eq!(document, refy_contract::document_json().unwrap());
}

#[tokio::test]
async fn check_against_running_server_is_clean() {
    // Arrange
    let base_url = start_docs_server().await;

    // Act
    let violations = CheckCommand::check(&DocumentSource::Server(base_url))
        .await
        .unwrap();

    // Assert
    assert!(violations.is_empty(), "{violations:?}");
}

#[tokio::test]
async fn missing_document_is_reported_as_not_found() {
    // Arrange
    let base_url = start_docs_server().await.join("nowhere/").unwrap();

    // Act
    let result = client(base_url).fetch_document().await;

    // Assert
    assert!(matches!(result, Err(DocsClientError::NotFound)));
}

#[tokio::test]
async fn client_errors_are_attempted_once() {
    // Arrange
    let (base_url, hits) = start_failing_server(StatusCode::BAD_REQUEST, "bad request").await;

    // Act
    let result = client(base_url).fetch_document().await;

    // Assert
    assert!(matches!(
        result,
        Err(DocsClientError::Other(status, ref body)) if status == StatusCode::BAD_REQUEST && body == "bad request"
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_errors_are_retried_and_keep_the_last_body() {
    // Arrange
    let (base_url, hits) =
        start_failing_server(StatusCode::SERVICE_UNAVAILABLE, "maintenance").await;

    // Act
    let result = client(base_url).fetch_document().await;

    // Assert
    assert!(matches!(
        result,
        Err(DocsClientError::Other(status, ref body))
            if status == StatusCode::SERVICE_UNAVAILABLE && body == "maintenance"
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}
