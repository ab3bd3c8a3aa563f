use axum::{
    Router,
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt};
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub trait TracingExtensions {
    fn with_tracing(self) -> Self;
    fn with_request_id(self) -> Self;
    fn with_correlation_id(self) -> Self;
}

/// JSON logs filtered by `RUST_LOG`, `info` when unset. `log` records from
/// dependencies are forwarded into the same subscriber.
pub fn init_tracing() -> anyhow::Result<()> {
    LogTracer::init()?;

    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .boxed();
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let subscriber = Registry::default().with(filter_layer).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

// Layers wrap in reverse order: apply `with_tracing` first so the id
// middlewares have already run when the request span is created.
impl<S> TracingExtensions for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_tracing(self) -> Self {
        self.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    let request_id = header_str(req, REQUEST_ID_HEADER).unwrap_or_default();
                    let correlation_id = header_str(req, CORRELATION_ID_HEADER);

                    tracing::info_span!(
                        "request",
                        %request_id,
                        correlation_id,
                        method = %req.method(),
                        uri = %req.uri(),
                        version = ?req.version()
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
    }

    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    fn with_correlation_id(self) -> Self {
        self.layer(middleware::from_fn(correlation_id_middleware))
    }
}

fn header_str<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn generate_request_id() -> Option<HeaderValue> {
    HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()
}

/// Identifies every log line of one request. Taken from the caller when
/// present, generated otherwise, and always returned in the response.
async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);

    let Some(request_id) = req
        .headers()
        .get(&header_name)
        .cloned()
        .or_else(generate_request_id)
    else {
        return next.run(req).await;
    };

    req.headers_mut()
        .insert(header_name.clone(), request_id.clone());
    req.extensions_mut().insert(request_id.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(header_name, request_id);

    res
}

/// Correlation ids are owned by the client that started the flow; the server
/// only echoes them back.
async fn correlation_id_middleware(req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static(CORRELATION_ID_HEADER);
    let correlation_id = req.headers().get(&header_name).cloned();

    let mut res = next.run(req).await;
    if let Some(cid) = correlation_id {
        res.headers_mut().insert(header_name, cid);
    }

    res
}
