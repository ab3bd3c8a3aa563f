use crate::handlers;
use crate::infrastructure::TracingExtensions;
use anyhow::Context;
use axum::Router;
use config::Config;
use serde::Deserialize;
use std::net::Ipv4Addr;
use tokio::net::TcpListener;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    const CONFIG_PREFIX: &'static str = "SERVER_CONFIG";
    const DEFAULT_PORT: u16 = 3000;

    pub fn load_from_env() -> anyhow::Result<Self> {
        let config = Config::builder()
            .set_default("port", i64::from(Self::DEFAULT_PORT))?
            .add_source(config::Environment::with_prefix(Self::CONFIG_PREFIX).separator("__"))
            .build()?
            .try_deserialize::<ServerConfig>()?;

        Ok(config)
    }
}

/// Landing page, Swagger UI and the raw document. Nothing else is routed, so
/// the documented API paths answer 404 here.
pub fn build_router() -> Router {
    let (router, api) = OpenApiRouter::with_openapi(refy_contract::document().clone())
        .merge(handlers::router())
        .split_for_parts();

    router
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, api))
        .with_tracing()
        .with_request_id()
        .with_correlation_id()
}

pub async fn init_server() -> anyhow::Result<(Router, TcpListener)> {
    let config = ServerConfig::load_from_env().context("failed to load server configuration")?;
    info!(port = config.port, "configuration loaded");

    let server = build_router();

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    Ok((server, listener))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_3000() {
        // Act
        let config = Config::builder()
            .set_default("port", i64::from(ServerConfig::DEFAULT_PORT))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<ServerConfig>()
            .unwrap();

        // Assert
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn port_can_be_overridden_by_source() {
        // Arrange
        let source = config::Environment::with_prefix(ServerConfig::CONFIG_PREFIX)
            .separator("__")
            .source(Some(
                [("SERVER_CONFIG__PORT".to_owned(), "8080".to_owned())]
                    .into_iter()
                    .collect(),
            ));

        // Act
        let config = Config::builder()
            .set_default("port", i64::from(ServerConfig::DEFAULT_PORT))
            .unwrap()
            .add_source(source)
            .build()
            .unwrap()
            .try_deserialize::<ServerConfig>()
            .unwrap();

        // Assert
        assert_eq!(config.port, 8080);
    }
}
