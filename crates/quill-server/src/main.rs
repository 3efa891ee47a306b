//! # Quill Server
//!
//! Loads configuration, wires the object graph, and serves the REST API
//! until Ctrl+C or SIGTERM.

use quill_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use quill_core::{QuillError, QuillResult};
use quill_rest::create_router;
use quill_server::{di, startup};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            startup::init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    startup::init_logging(&config.observability);

    info!("Starting Quill server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn load_config() -> QuillResult<AppConfig> {
    let loader = ConfigLoader::from_default_location()?;
    Ok(loader.into_config())
}

async fn run(config: AppConfig) -> QuillResult<()> {
    let module = di::build_app_module(&config).await?;
    let router = create_router(module.as_ref(), &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QuillError::Internal(format!("Failed to bind {addr}: {e}")))?;

    startup::print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| QuillError::Internal(format!("REST server error: {e}")));

    di::shutdown_module(&module).await;
    info!("Server shutdown complete");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
