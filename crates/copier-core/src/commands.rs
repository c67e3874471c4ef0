//! Owner control commands.

use std::sync::Arc;

use tracing::{info, warn};

use crate::state::RelayState;

/// Commands that change or report the relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerCommand {
    StartForward,
    StopForward,
    Status,
}

impl OwnerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            OwnerCommand::StartForward => "/start_forward",
            OwnerCommand::StopForward => "/stop_forward",
            OwnerCommand::Status => "/status",
        }
    }
}

/// Applies owner commands to the relay state and produces reply text.
pub struct CommandHandler {
    state: Arc<RelayState>,
}

impl CommandHandler {
    pub fn new(state: Arc<RelayState>) -> Self {
        Self { state }
    }

    /// Run a command on behalf of `user_id`.
    ///
    /// Returns the reply to send, or `None` when the invoker is not the owner
    /// (no reply, no state change).
    pub fn handle(&self, user_id: Option<u64>, command: OwnerCommand) -> Option<String> {
        let Some(user_id) = user_id.filter(|id| self.state.is_owner(*id)) else {
            warn!(
                user_id = ?user_id,
                command = command.name(),
                "Unauthorized command attempt"
            );
            return None;
        };

        let reply = match command {
            OwnerCommand::StartForward => {
                let toggle = self.state.set_enabled(true);
                if toggle.changed {
                    info!(user_id, "Forwarding set to ACTIVE by owner");
                    "▶️ Forwarding started."
                } else {
                    "✅ Forwarding is already active."
                }
            }
            OwnerCommand::StopForward => {
                let toggle = self.state.set_enabled(false);
                if toggle.changed {
                    info!(user_id, "Forwarding set to INACTIVE by owner");
                    "⏸️ Forwarding paused."
                } else {
                    "⏸️ Forwarding is already paused."
                }
            }
            OwnerCommand::Status => {
                info!(user_id, "Status requested by owner");
                return Some(self.state.describe().to_string());
            }
        };

        Some(format!(
            "{}\n\n<b>Forwarding:</b> {}",
            reply,
            self.state.describe().label()
        ))
    }
}

/// Welcome text for `/start` and `/help` in a private chat.
pub fn welcome_text() -> &'static str {
    "👋 Welcome to the Channel Copier Bot!\n\n\
    I copy every new post from the source channel into the target channel.\n\n\
    If you are the owner, you can use:\n\
    • /status - Show the configuration and forwarding status\n\
    • /start_forward - Resume copying\n\
    • /stop_forward - Pause copying\n\n\
    If you never received the startup permission report, check that:\n\
    1. Your Telegram user id is set as <code>OWNER_ID</code>.\n\
    2. The bot is a member of the source channel and an administrator with \
    'Post messages' permission in the target channel."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelRef;

    const OWNER: u64 = 555;

    fn handler() -> (CommandHandler, Arc<RelayState>) {
        let state = Arc::new(RelayState::new(
            ChannelRef::Id(-100111),
            ChannelRef::Id(-100222),
            OWNER,
        ));
        (CommandHandler::new(Arc::clone(&state)), state)
    }

    #[test]
    fn test_non_owner_is_ignored() {
        let (handler, state) = handler();

        for command in [OwnerCommand::StopForward, OwnerCommand::StartForward, OwnerCommand::Status] {
            assert_eq!(handler.handle(Some(42), command), None);
            assert_eq!(handler.handle(None, command), None);
        }
        assert!(state.is_enabled());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (handler, state) = handler();

        let first = handler.handle(Some(OWNER), OwnerCommand::StopForward).unwrap();
        assert!(first.contains("Forwarding paused."));
        assert!(first.contains("Inactive"));
        assert!(!state.is_enabled());

        let second = handler.handle(Some(OWNER), OwnerCommand::StopForward).unwrap();
        assert!(second.contains("already paused"));
        assert!(!state.is_enabled());
    }

    #[test]
    fn test_start_when_already_active() {
        let (handler, state) = handler();

        let reply = handler.handle(Some(OWNER), OwnerCommand::StartForward).unwrap();
        assert!(reply.contains("already active"));
        assert!(reply.contains("Active"));
        assert!(state.is_enabled());
    }

    #[test]
    fn test_restart_after_stop() {
        let (handler, state) = handler();
        handler.handle(Some(OWNER), OwnerCommand::StopForward);

        let reply = handler.handle(Some(OWNER), OwnerCommand::StartForward).unwrap();
        assert!(reply.contains("Forwarding started."));
        assert!(state.is_enabled());
    }

    #[test]
    fn test_status_reports_configuration() {
        let (handler, _) = handler();

        let status = handler.handle(Some(OWNER), OwnerCommand::Status).unwrap();
        for expected in ["-100111", "-100222", "555", "Active"] {
            assert!(status.contains(expected), "missing {}", expected);
        }

        handler.handle(Some(OWNER), OwnerCommand::StopForward);
        let status = handler.handle(Some(OWNER), OwnerCommand::Status).unwrap();
        assert!(status.contains("Inactive"));
    }

    #[test]
    fn test_welcome_lists_commands() {
        let text = welcome_text();
        assert!(text.contains("/status"));
        assert!(text.contains("/start_forward"));
        assert!(text.contains("/stop_forward"));
    }
}
