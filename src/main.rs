use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use orderdesk::adapters::SqliteStore;
use orderdesk::api::{self, AppState};
use orderdesk::cli::{self, output, Cli, Commands};
use orderdesk::config::{AppConfig, LoggingConfig};
use orderdesk::error::{DeskError, Result};
use orderdesk::exchange::{build_gateway, Credentials};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)?;
    if cli.mainnet {
        config.exchange = config.exchange.mainnet();
    }
    if let Err(errors) = config.validate() {
        for error in &errors {
            output::print_error(&format!("config error: {error}"));
        }
        return Err(DeskError::Internal("invalid configuration".to_string()));
    }

    match cli.command {
        Commands::Order {
            symbol,
            side,
            order_type,
            quantity,
            price,
            stop_price,
            dry_run,
            json,
        } => {
            let _guard = init_logging(&config.logging);
            let store = open_store(&config).await?;
            let credentials = Credentials::resolve(&store).await?;
            let gateway = build_gateway(&config.exchange, credentials, dry_run)?;

            cli::order::run(
                gateway.as_ref(),
                &store,
                cli::order::OrderArgs {
                    symbol,
                    side,
                    order_type,
                    quantity,
                    price,
                    stop_price,
                    json,
                },
            )
            .await?;
        }
        Commands::History { limit, json } => {
            init_logging_simple();
            let store = open_store(&config).await?;
            cli::history::run(&store, limit, output::OutputMode::from_json_flag(json)).await?;
        }
        Commands::Setup => {
            init_logging_simple();
            let store = open_store(&config).await?;
            cli::setup::run(&store, &config.exchange).await?;
        }
        Commands::Ping => {
            init_logging_simple();
            let store = open_store(&config).await?;
            let credentials = Credentials::resolve(&store).await?;
            // ping is unsigned, so a credential-less gateway is fine here
            let dry_run = credentials.is_none();
            let gateway = build_gateway(&config.exchange, credentials, dry_run)?;
            cli::test_connection(gateway.as_ref()).await?;
        }
        Commands::Serve { port, dry_run } => {
            let _guard = init_logging(&config.logging);
            let store = Arc::new(open_store(&config).await?);
            let credentials = Credentials::resolve(&store).await?;
            let gateway = build_gateway(&config.exchange, credentials, dry_run)?;

            let state = AppState::new(store, gateway, config.exchange.clone(), dry_run);
            let port = port.unwrap_or(config.server.port);
            api::serve(state, &config.server.host, port).await?;
        }
    }

    Ok(())
}

async fn open_store(config: &AppConfig) -> Result<SqliteStore> {
    let store = SqliteStore::new(&config.database.url, config.database.max_connections).await?;
    store.migrate().await?;
    Ok(store)
}

/// Console logging plus, when `logging.dir` is set, a daily-rolling file.
/// The returned guard must stay alive for the file writer to flush.
fn init_logging(config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("info,orderdesk={},sqlx=warn", config.level))
    });

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    match config.dir.as_deref().filter(|d| !d.is_empty()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "orderdesk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            None
        }
    }
}

fn init_logging_simple() {
    // Minimal logging for quick CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
