//! Channel Copier bot binary.
//!
//! Start the bot with:
//! ```bash
//! BOT_TOKEN=xxx CHANNEL_SOURCE_ID=-100... CHANNEL_TARGET_ID=-100... OWNER_ID=... \
//!     cargo run -p copier-telegram
//! ```

use clap::Parser;
use copier_core::CopierConfig;
use copier_telegram::CopierBot;
use tracing_subscriber::EnvFilter;

/// Channel Copier - copy posts from one Telegram channel to another
#[derive(Parser, Debug)]
#[command(name = "channel-copier")]
#[command(about = "Copies posts from a source Telegram channel into a target channel")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Local overrides first; dotenvy never replaces variables already set
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let filter = match args.verbose {
        0 => "copier_telegram=info,copier_core=info,teloxide=warn",
        1 => "copier_telegram=debug,copier_core=debug,teloxide=info",
        2 => "copier_telegram=trace,copier_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match CopierConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            for problem in e.problems() {
                tracing::error!(problem = %problem, "Configuration error");
            }
            return Err(e.into());
        }
    };

    let bot = match CopierBot::connect(config).await {
        Ok(bot) => bot,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to Telegram");
            return Err(e.into());
        }
    };

    tracing::info!(username = %bot.username(), "Bot initialized successfully");
    println!("\n[robot] Channel Copier Bot");
    println!("   Bot: @{}", bot.username());
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
