//! Kitchen simulation entry point.

use domain::TracingOrderLogger;
use lab::{Config, LogFormat};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, stopping simulation");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, stopping simulation");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = Config::from_env().expect("invalid configuration");

    // 2. Initialize tracing
    init_tracing(&config);
    tracing::info!(
        workers = config.workers,
        orders_per_worker = config.orders_per_worker,
        bounds = ?config.service.bounds,
        transitions = ?config.service.transitions,
        "starting kitchen simulation"
    );

    // 3. Run until done or interrupted
    tokio::select! {
        result = lab::run(&config, TracingOrderLogger) => {
            let summary = result.expect("simulation failed");
            let json = serde_json::to_string_pretty(&summary).expect("summary serializes");
            println!("{json}");
        }
        () = shutdown_signal() => {}
    }
}
