use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use auction_alerts::config::Config;
use auction_alerts::notify::TelegramNotifier;
use auction_alerts::ws;

#[derive(Parser)]
#[command(name = "auction-alerts")]
#[command(version)]
#[command(about = "Forward on-chain auction events to a Telegram chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for auction events on a node and alert a Telegram chat.
    #[clap(name = "subscribe-auctions")]
    SubscribeAuctions(SubscribeOpts),
}

#[derive(Debug, Parser)]
struct SubscribeOpts {
    /// rpc node address
    #[clap(long = "node", default_value = "http://localhost:26657")]
    node: String,

    /// telegram bot id
    #[clap(long = "bot-id", default_value = "")]
    bot_id: String,

    /// telegram chat id
    #[clap(long = "chat-id", default_value = "")]
    chat_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::SubscribeAuctions(opts) => subscribe_auctions(opts).await,
    }
}

async fn subscribe_auctions(opts: SubscribeOpts) -> Result<()> {
    let config = Config::from_flags(opts.node, opts.bot_id, opts.chat_id);

    info!("auction-alerts v{} starting", env!("CARGO_PKG_VERSION"));
    if !config.telegram.is_configured() {
        warn!(
            "telegram target not fully configured - alerts will be logged \
             but not delivered (set --bot-id and --chat-id)"
        );
    }

    let notifier = TelegramNotifier::new(config.telegram.clone());
    ws::node::run(&config, &notifier).await?;
    Ok(())
}
