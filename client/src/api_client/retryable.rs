use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::api_client::{CORRELATION_ID_HEADER, DocsClient, errors::DocsClientError};

fn is_transient_http(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn retry_after(resp: &Response) -> Option<Duration> {
    resp.headers()
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Clone, Debug)]
pub struct RetrySettings {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub respect_retry_after: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            respect_retry_after: true,
        }
    }
}

// Doubles from `base_delay` up to `max_delay`, with jitter.
fn backoff(settings: RetrySettings) -> impl Iterator<Item = Duration> {
    let factor = (settings.base_delay.as_millis() as u64 / 2).max(1);

    ExponentialBackoff::from_millis(2)
        .factor(factor)
        .max_delay(settings.max_delay)
        .map(jitter)
        .take(settings.max_retries)
}

pub trait Retryable {
    async fn send_with_retries(
        &self,
        req_builder: RequestBuilder,
    ) -> Result<Response, DocsClientError>;
}

impl Retryable for DocsClient {
    async fn send_with_retries(
        &self,
        req_builder: RequestBuilder,
    ) -> Result<Response, DocsClientError> {
        let retry_settings = self.retry_settings.clone();
        let req_builder = req_builder.header(CORRELATION_ID_HEADER, self.args.correlation_id.to_string());

        let Some(request) = req_builder.try_clone().and_then(|r| r.build().ok()) else {
            return Err(DocsClientError::Unexpected(
                "request cannot be replayed".to_owned(),
            ));
        };
        let method = request.method().as_str().to_owned();
        let url = request.url().to_string();
        let request_id = Uuid::new_v4().to_string();

        let strategy = backoff(retry_settings.clone());

        RetryIf::spawn(
            strategy,
            move || {
                let attempt = req_builder.try_clone();
                let retry_settings = retry_settings.clone();
                let span = tracing::info_span!("http.client", %method, %url, %request_id);

                async move {
                    let Some(attempt) = attempt else {
                        return Err(DocsClientError::Unexpected(
                            "request cannot be replayed".to_owned(),
                        ));
                    };

                    match attempt.send().instrument(span.clone()).await {
                        Ok(resp) => {
                            let status = resp.status();
                            if !is_transient_http(status) {
                                return Ok(resp);
                            }

                            if retry_settings.respect_retry_after
                                && let Some(wait) = retry_after(&resp)
                            {
                                tracing::warn!(
                                    parent: &span,
                                    status = %status,
                                    ?wait,
                                    "transient HTTP; honoring Retry-After"
                                );
                                tokio::time::sleep(wait.min(retry_settings.max_delay)).await;
                            }
                            Err(DocsClientError::from_response(resp).await)
                        }
                        Err(e) => {
                            let err = DocsClientError::from(e);
                            if err.is_transient() {
                                tracing::warn!(parent: &span, error = %err, "transient network; retrying");
                            } else {
                                tracing::error!(parent: &span, error = %err, "non-retryable error");
                            }
                            Err(err)
                        }
                    }
                }
            },
            DocsClientError::is_transient,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_transient() {
        assert!(is_transient_http(StatusCode::BAD_GATEWAY));
        assert!(is_transient_http(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_transient_http(StatusCode::NOT_FOUND));
        assert!(!is_transient_http(StatusCode::OK));
    }

    #[test]
    fn backoff_doubles_from_base_delay_up_to_cap() {
        // Arrange
        let settings = RetrySettings {
            max_retries: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(1),
            respect_retry_after: false,
        };
        let ceilings = [200, 400, 800, 1000, 1000].map(Duration::from_millis);

        // Act
        let delays: Vec<Duration> = backoff(settings).collect();

        // Assert
        assert_eq!(delays.len(), ceilings.len());
        for (delay, ceiling) in delays.iter().zip(ceilings) {
            assert!(*delay <= ceiling, "{delay:?} > {ceiling:?}");
        }
    }
}
