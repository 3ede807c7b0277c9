use clap::Parser;
use tracing::{error, info};

use todo_app::logging::init_logging;
use todo_app::version::VERSION;
use todo_app::webapp::api_client::ApiClient;
use todo_app::webapp::config::WebAppConfig;
use todo_app::webapp::create_webapp_router;
use todo_app::webapp::views::Views;

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
    if std::env::args().any(|arg| arg == "--version") {
        println!("todo-web version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();

    let config = match WebAppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load web app configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&config.log_dir, "todo-web.log");
    info!("Starting todo-web, version: {}", VERSION);

    let api = ApiClient::new(&config.api_base_url, config.api_token.clone())?;
    let views = Views::new().map_err(|e| {
        error!(error = %e, "Failed to load page templates.");
        e
    })?;
    info!(api = %config.api_base_url, "Using task API.");

    let app = create_webapp_router(api, views);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("todo-web listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Box::new)?;

    Ok(())
}
