pub mod history;
pub mod order;
pub mod output;
pub mod setup;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::exchange::FuturesGateway;

#[derive(Parser)]
#[command(name = "orderdesk")]
#[command(version)]
#[command(about = "Binance USDⓈ-M futures order terminal (CLI + web)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Target the production venue instead of the testnet
    #[arg(long)]
    pub mainnet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Place an order
    Order {
        /// Trading pair symbol (e.g. BTCUSDT)
        #[arg(short, long)]
        symbol: String,
        /// Order side: BUY or SELL
        #[arg(long)]
        side: String,
        /// Order type: MARKET, LIMIT, STOP or STOP_MARKET
        #[arg(short = 't', long = "type")]
        order_type: String,
        /// Order quantity
        #[arg(short, long)]
        quantity: Decimal,
        /// Limit price (required for LIMIT and STOP)
        #[arg(short, long)]
        price: Option<Decimal>,
        /// Stop trigger price (required for STOP and STOP_MARKET)
        #[arg(long)]
        stop_price: Option<Decimal>,
        /// Log and acknowledge locally instead of submitting
        #[arg(long)]
        dry_run: bool,
        /// Print the acknowledgment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show order history
    History {
        /// Maximum rows to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure API credentials
    Setup,
    /// Test exchange connectivity
    Ping,
    /// Run the web API server
    Serve {
        /// Port override for the web API
        #[arg(long)]
        port: Option<u16>,
        /// Build the gateway in dry-run mode
        #[arg(long)]
        dry_run: bool,
    },
}

/// `orderdesk ping`: round-trip the venue ping endpoint.
pub async fn test_connection(gateway: &dyn FuturesGateway) -> Result<()> {
    gateway.ping().await?;
    output::print_success(&format!("connected to {}", gateway.venue()));
    Ok(())
}
