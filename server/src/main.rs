use refy_docs_server::{infrastructure, server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    infrastructure::init_infrastructure()?;
    let (server, listener) = server::init_server().await?;

    info!(address = %listener.local_addr()?, "Refy Swagger is running");

    axum::serve(listener, server)
        .with_graceful_shutdown(infrastructure::graceful_shutdown_signal())
        .await?;

    Ok(())
}
