//! Owner notifications and the global error sink.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::transport::Transport;

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the diagnostic sent to the owner for an unhandled failure.
pub fn format_diagnostic(error: &dyn fmt::Display, chat_id: Option<i64>) -> String {
    let mut message = format!(
        "🔥 <b>Bot Error</b> 🔥\n\nAn error occurred while processing an update:\n<code>{}</code>",
        escape_html(&error.to_string())
    );
    if let Some(chat_id) = chat_id {
        message.push_str(&format!("\n\n<b>Chat ID:</b> <code>{}</code>", chat_id));
    }
    message
}

/// Sends messages to the owner and sinks unhandled handler failures.
///
/// Nothing here ever returns an error: a failed notification is logged and
/// dropped so it can't cascade.
pub struct ErrorNotifier {
    transport: Arc<dyn Transport>,
    owner_id: u64,
}

impl ErrorNotifier {
    pub fn new(transport: Arc<dyn Transport>, owner_id: u64) -> Self {
        Self {
            transport,
            owner_id,
        }
    }

    /// Best-effort message to the owner. Returns whether it was delivered.
    pub async fn send_owner(&self, text: &str) -> bool {
        match self.transport.send_to_user(self.owner_id, text).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    owner_id = self.owner_id,
                    error = %e,
                    "Failed to send message to owner"
                );
                false
            }
        }
    }

    /// Log an unhandled failure and tell the owner about it.
    pub async fn notify(&self, failure: &(dyn fmt::Display + Sync), chat_id: Option<i64>) {
        error!(error = %failure, chat_id = ?chat_id, "Error while handling an update");

        if self.send_owner(&format_diagnostic(failure, chat_id)).await {
            info!(owner_id = self.owner_id, "Owner notified of error");
        }
    }
}
