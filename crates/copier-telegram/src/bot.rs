//! Main Telegram bot implementation.

use std::sync::Arc;

use copier_core::{
    create_shared_state, CommandHandler, CopierConfig, ErrorNotifier, EventRelay,
    PermissionVerifier, RelayState, Transport,
};
use futures::future::BoxFuture;
use secrecy::ExposeSecret;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::error_handlers::ErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::error::{Result, TelegramError};
use crate::handlers::{handle_channel_post, handle_command, Command};
use crate::transport::TeloxideTransport;

/// Dispatcher error handler that forwards every failure to the owner.
pub struct OwnerErrorHandler {
    notifier: Arc<ErrorNotifier>,
}

impl OwnerErrorHandler {
    pub fn new(notifier: Arc<ErrorNotifier>) -> Arc<Self> {
        Arc::new(Self { notifier })
    }
}

impl ErrorHandler<TelegramError> for OwnerErrorHandler {
    fn handle_error(self: Arc<Self>, error: TelegramError) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.notifier.notify(&error, error.chat_id()).await;
        })
    }
}

/// The channel copier bot.
pub struct CopierBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// The bot's own username, for logs.
    username: String,
    /// Shared relay state across handlers.
    state: Arc<RelayState>,
    transport: Arc<dyn Transport>,
    notifier: Arc<ErrorNotifier>,
    relay: Arc<EventRelay>,
    commands: Arc<CommandHandler>,
}

impl CopierBot {
    /// Authenticate with Telegram and wire up all components.
    pub async fn connect(config: CopierConfig) -> Result<Self> {
        let bot = Bot::new(config.bot_token.expose_secret());

        let me = bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        let username = me.username().to_string();

        let transport: Arc<dyn Transport> = Arc::new(TeloxideTransport::new(bot.clone(), me.id));
        let state = create_shared_state(&config);
        let notifier = Arc::new(ErrorNotifier::new(Arc::clone(&transport), config.owner_id));
        let relay = Arc::new(EventRelay::new(
            Arc::clone(&state),
            Arc::clone(&transport),
            Arc::clone(&notifier),
            config.album_quiet,
        ));
        let commands = Arc::new(CommandHandler::new(Arc::clone(&state)));

        Ok(Self {
            bot,
            username,
            state,
            transport,
            notifier,
            relay,
            commands,
        })
    }

    /// The bot's username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check channel permissions and report the result to the owner.
    ///
    /// Never fails: problems are reported, and the bot keeps running.
    pub async fn verify_permissions(&self) {
        let verifier = PermissionVerifier::new(Arc::clone(&self.state), Arc::clone(&self.transport));
        let report = verifier.verify_and_report(&self.notifier).await;
        if report.all_ok() {
            info!("All channel permissions verified");
        } else {
            warn!("Startup permission check found problems, continuing anyway");
        }
    }

    /// Register the command list for client autocomplete.
    async fn register_commands(&self) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Failed to register bot commands");
        }
    }

    /// Run the startup checks, then long-poll until Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!(username = %self.username, "Starting Telegram bot in polling mode...");

        self.register_commands().await;
        self.verify_permissions().await;

        let relay = Arc::clone(&self.relay);
        let commands = Arc::clone(&self.commands);

        let handler = dptree::entry()
            .branch(
                Update::filter_channel_post().endpoint(move |msg: Message| {
                    let relay = Arc::clone(&relay);
                    async move { handle_channel_post(msg, relay).await }
                }),
            )
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let commands = Arc::clone(&commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, commands).await }
                    }),
            );

        info!(
            source = %self.state.source(),
            target = %self.state.target(),
            "Bot is running! Copying posts from source to target."
        );

        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd.kind);
            })
            .error_handler(OwnerErrorHandler::new(Arc::clone(&self.notifier)))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Bot stopped");
        Ok(())
    }
}
