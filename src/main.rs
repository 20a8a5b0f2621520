use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use folio_daemon::config::{data_dir, load_config, AppConfig};
use folio_daemon::cors::{build_cors_layer, DEFAULT_CORS_ORIGINS};
use folio_daemon::logging::{
    init_logging, parse_rotation, set_log_file_path, LogConfig, LOG_FILENAME,
};
use folio_daemon::media::{LocalMediaStore, MediaStorage};
use folio_daemon::server::{build_router, AppContext};
use folio_daemon::store::{DocumentStore, JsonFileStore};

const DEFAULT_ADDR: &str = "127.0.0.1:4170";

/// Folio Daemon - Portfolio content service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "FOLIO_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    #[arg(
        long,
        env = "FOLIO_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        value_delimiter = ','
    )]
    cors_origins: Vec<String>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "FOLIO_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "FOLIO_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: <data-dir>/logs)
    #[arg(long, env = "FOLIO_LOG_DIR")]
    log_dir: Option<String>,

    /// Data directory (default: ~/.folio, or FOLIO_HOME)
    #[arg(long, env = "FOLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

fn report_bind_error(addr: std::net::SocketAddr, log_file: &std::path::Path, e: &std::io::Error) {
    if e.kind() == std::io::ErrorKind::AddrInUse {
        eprintln!();
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of folio-daemon may already be running.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  1. Kill the existing process:   pkill folio-daemon");
        eprintln!("  2. Use a different port:        folio-daemon --addr 127.0.0.1:4171");
        eprintln!("  3. Check what's using the port: lsof -i :{}", addr.port());
        eprintln!();
    }
    eprintln!();
    eprintln!("Error: Failed to start server: {e}");
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal, stopping server...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let data_dir = data_dir(args.data_dir.clone());

    // Configure and initialize logging
    let log_dir = args
        .log_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("logs"));
    let log_file = log_dir.join(LOG_FILENAME);
    set_log_file_path(log_file.to_string_lossy().to_string());

    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    // Load config.toml from the data dir; the file is optional.
    let config = load_config(&data_dir).unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {e}");
        AppConfig::with_data_dir(data_dir.clone())
    });

    std::fs::create_dir_all(data_dir.join("media"))?;

    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&data_dir));
    let media: Arc<dyn MediaStorage> = Arc::new(LocalMediaStore::new(
        &data_dir.join("media"),
        &config.media.public_base,
    ));
    let ctx = Arc::new(AppContext::new(config, store, media));

    // Parse address
    let addr: std::net::SocketAddr = args.addr.parse()?;

    // Process CORS origins
    let cors_origins: Vec<String> = args
        .cors_origins
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    info!(
        "CORS origins: {}",
        if allow_all_origins {
            "*".to_string()
        } else {
            cors_origins.join(", ")
        }
    );

    let app = build_router(ctx).layer(build_cors_layer(cors_origins));

    info!("Starting folio daemon on {} (HTTP/JSON)", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            report_bind_error(addr, &log_file, &e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Folio daemon stopped");
    Ok(())
}
