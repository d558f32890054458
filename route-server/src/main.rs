use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use route_server::config::ServerConfig;
use route_server::web::{AppState, create_router};

const DEFAULT_LOG_LEVEL: &str = "info";

fn init_tracing() {
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let (filter, invalid) = match EnvFilter::try_new(&rust_log) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_LOG_LEVEL), Some(err)),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    if let Some(err) = invalid {
        warn!(
            "Invalid {} value {rust_log:?}: {err}. Falling back to {DEFAULT_LOG_LEVEL}.",
            EnvFilter::DEFAULT_ENV
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = ServerConfig::from_env();
    info!(
        data = %config.data,
        static_dir = %config.static_dir.display(),
        transfer_cost = config.planner.transfer_cost,
        max_distance_km = config.planner.max_distance_km,
        special_line = %config.planner.special_line,
        adjacency = %config.planner.adjacency,
        "Loaded configuration"
    );

    let source = config.data.open();

    // Check the data source once so a bad path fails fast
    let probe = source.clone();
    match tokio::task::spawn_blocking(move || probe.active_stations()).await {
        Ok(Ok(stations)) => info!(count = stations.len(), "Station data available"),
        Ok(Err(e)) => {
            error!(data = %config.data, "Failed to read station data: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("Station data check did not complete: {e}");
            return ExitCode::FAILURE;
        }
    }

    let state = AppState::from_shared(source, config.planner.clone());
    let app = create_router(state, &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "Failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Route planner listening on http://{}", config.bind_addr);
    info!("  GET  /health        - Health check");
    info!("  GET  /api/stations  - List active stations");
    info!("  POST /api/route     - Plan a route");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
