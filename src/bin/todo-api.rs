use clap::Parser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tracing::{error, info};

use todo_app::db::schema::ensure_schema;
use todo_app::logging::init_logging;
use todo_app::server::config::ApiConfig;
use todo_app::version::VERSION;
use todo_app::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for the shutdown signal.");
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Manually check for --version before full parsing to keep the output simple.
    if std::env::args().any(|arg| arg == "--version") {
        println!("todo-api version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();

    // --- Config Setup ---
    let config = match ApiConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load API configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir, "todo-api.log");
    info!("Starting todo-api, version: {}", VERSION);

    // --- Database Pool Setup ---
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10).sqlx_logging(false);

    let db_pool: DatabaseConnection = Database::connect(opt).await.map_err(|e| {
        error!(error = %e, "Failed to create database connection.");
        e
    })?;
    ensure_schema(&db_pool).await?;

    let app = create_axum_router(db_pool, config.clone());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("todo-api listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Box::new)?;

    Ok(())
}
