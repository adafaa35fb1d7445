//! Web server for the readings endpoint.
//!
//! Every `GET` takes a fresh reading from the sensors and returns it as JSON;
//! every `OPTIONS` answers a CORS preflight. The serve loop runs on its own
//! task so the caller stays free to wait for an interrupt.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::{AddressFamily, ServerConfig};
pub use router::create_app;

use crate::error::{ExporterError, Result};
use crate::sensors::SensorContext;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// A running exporter: the serve task plus the means to stop it.
pub struct HttpExporter {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<()>>,
}

impl HttpExporter {
    /// Bind the configured address and start serving.
    pub async fn bind(config: &ServerConfig, sensors: SensorContext) -> Result<Self> {
        let addr = config.bind_address();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            ExporterError::web_server_error(format!("Failed to bind to {}: {}", addr, e))
        })?;
        Self::spawn(listener, sensors)
    }

    /// Start serving on an already bound listener.
    pub fn spawn(listener: TcpListener, sensors: SensorContext) -> Result<Self> {
        let local_addr = listener.local_addr()?;
        let app = create_app(sensors);
        let (shutdown, signal) = oneshot::channel::<()>();

        info!("serving at {}", local_addr);

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    // a dropped sender also stops the server
                    let _ = signal.await;
                })
                .await
                .map_err(|e| ExporterError::web_server_error(format!("Server error: {}", e)))
        });

        Ok(Self {
            local_addr,
            shutdown,
            task,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, let in-flight requests finish and wait
    /// for the serve task to end.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| ExporterError::web_server_error(format!("Server task failed: {}", e)))?
    }
}

/// Serve readings until SIGINT, then shut down gracefully.
pub async fn run_until_interrupted(config: ServerConfig, sensors: SensorContext) -> Result<()> {
    let exporter = HttpExporter::bind(&config, sensors).await?;

    tokio::signal::ctrl_c().await?;
    info!("SIGINT or CTRL-C detected. Exiting gracefully");

    exporter.shutdown().await
}
