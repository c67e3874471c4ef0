//! Telegram channel copier bot.
//!
//! Copies every new post from a source channel into a target channel with
//! `copyMessage`, so copies carry no "forwarded from" header. Albums are
//! collected and copied in one call so they stay grouped.
//!
//! # Environment Variables
//!
//! Required:
//! - `BOT_TOKEN`: Bot token from @BotFather
//! - `CHANNEL_SOURCE_ID`: Source channel id or `@handle`
//! - `CHANNEL_TARGET_ID`: Target channel id or `@handle`
//! - `OWNER_ID`: Telegram user id of the owner
//!
//! Optional:
//! - `ALBUM_QUIET_MS`: Album quiet window in milliseconds (default: 1500)
//!
//! # Example
//!
//! ```no_run
//! use copier_core::CopierConfig;
//! use copier_telegram::CopierBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CopierConfig::from_env()?;
//!     let bot = CopierBot::connect(config).await?;
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start`, `/help` - Welcome message and setup help
//! - `/start_forward` - Resume copying (owner only)
//! - `/stop_forward` - Pause copying (owner only)
//! - `/status` - Show configuration and status (owner only)

pub mod bot;
pub mod error;
pub mod handlers;
pub mod retry;
pub mod transport;

pub use bot::{CopierBot, OwnerErrorHandler};
pub use error::{Result, TelegramError};
pub use handlers::Command;
pub use retry::RetryPolicy;
pub use transport::TeloxideTransport;
