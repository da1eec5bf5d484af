use actix_web::{App, HttpServer};
use clap::Parser;
use pnwer_ai::api::AppServices;
use pnwer_ai::cli::{commands::{Cli, Commands}, run_cli};
use pnwer_ai::config::AppConfig;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config).await;
        return Ok(());
    }

    info!("Starting PNWER AI Server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let services = AppServices::from_config(&config);

    if services.backend.is_configured() {
        match services.backend.ping().await {
            Ok(body) => info!("Backend reachable: {}", body),
            Err(e) => warn!("Backend unreachable: {}", e),
        }
    } else {
        warn!("No backend URL configured; uploads, vector context and file listing are disabled");
    }

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        let services = services.clone();
        App::new().configure(move |cfg| services.configure(cfg))
    })
    .bind((host, port))?
    .run()
    .await
}
