use crate::{create_router, AppState};
use codescope_core::{CodeScopeError, Result, Settings};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

pub struct Server {
    settings: Settings,
    state: AppState,
}

impl Server {
    pub fn new(settings: Settings) -> Result<Self> {
        let state = AppState::new()?;
        Ok(Self { settings, state })
    }

    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.settings.server.host, self.settings.server.port)
            .parse()
            .map_err(|e| {
                CodeScopeError::Internal(format!("invalid server address: {e}"))
            })?;

        let router = create_router(self.state, &self.settings.static_files);

        info!("Starting CodeScope API server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(CodeScopeError::Io)?;

        info!("Server listening on http://{}", addr);
        info!("API documentation:");
        info!("  POST /analyze-code - Analyze a code snippet");
        info!("  GET /health - Liveness check");
        if let Some(dir) = &self.settings.static_files.dir {
            info!("Serving static client from {:?}", dir);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(CodeScopeError::Io)?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
