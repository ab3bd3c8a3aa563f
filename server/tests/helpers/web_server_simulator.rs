use refy_docs_server::server;
use tokio::{net::TcpListener, task::JoinHandle};

// Serves the same router as the binary on an ephemeral port, without going
// through environment configuration.
pub struct WebServerSimulator {
    base_url: String,
    listener: TcpListener,
}

impl WebServerSimulator {
    pub async fn new() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let host = listener.local_addr()?;
        let base_url = format!("http://{}", host);

        Ok(Self { base_url, listener })
    }

    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    pub async fn start(self) -> JoinHandle<()> {
        let server = axum::serve(self.listener, server::build_router().into_make_service());

        tokio::spawn(async move {
            server.await.unwrap();
        })
    }
}
