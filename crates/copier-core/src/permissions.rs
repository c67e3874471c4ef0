//! Startup check of the bot's rights in both channels.
//!
//! Misconfiguration is reported to the owner but never stops the bot; failed
//! copies surface later through the error notifier.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::ChannelRef;
use crate::notifier::{escape_html, ErrorNotifier};
use crate::state::RelayState;
use crate::transport::{Membership, Transport};

/// Result of checking one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCheck {
    Ok,
    /// The bot is not in the source channel.
    NotMember,
    /// The bot is not an administrator of the target channel.
    NotAdministrator,
    /// Administrator of the target channel without "Post messages".
    CannotPost,
    /// The membership lookup itself failed.
    QueryFailed(String),
}

impl ChannelCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, ChannelCheck::Ok)
    }
}

/// Source channel: any membership is enough to receive posts.
pub fn check_source(membership: &Membership) -> ChannelCheck {
    if membership.can_read() {
        ChannelCheck::Ok
    } else {
        ChannelCheck::NotMember
    }
}

/// Target channel: must be able to post.
pub fn check_target(membership: &Membership) -> ChannelCheck {
    match membership {
        m if m.can_post() => ChannelCheck::Ok,
        Membership::Administrator { .. } => ChannelCheck::CannotPost,
        _ => ChannelCheck::NotAdministrator,
    }
}

/// Outcome of the startup check for both channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionReport {
    pub source: ChannelRef,
    pub source_check: ChannelCheck,
    pub target: ChannelRef,
    pub target_check: ChannelCheck,
}

impl PermissionReport {
    pub fn all_ok(&self) -> bool {
        self.source_check.is_ok() && self.target_check.is_ok()
    }

    /// The single message sent to the owner.
    pub fn render(&self) -> String {
        if self.all_ok() {
            return "✅ <b>All permissions verified!</b> The bot is ready to copy posts.".to_string();
        }

        let mut lines = vec![
            "⚠️ <b>Startup Warning:</b> one or more permissions are missing. \
            Copying may fail until they are fixed."
                .to_string(),
        ];

        match &self.source_check {
            ChannelCheck::Ok => {}
            ChannelCheck::QueryFailed(e) => lines.push(format!(
                "❌ Failed to check source channel <code>{}</code>. \
                Ensure the bot is added to the channel and the id is correct. Error: <code>{}</code>",
                self.source,
                escape_html(e)
            )),
            _ => lines.push(format!(
                "❌ Bot is not a member of the source channel <code>{}</code>. \
                Please add the bot to the channel.",
                self.source
            )),
        }

        match &self.target_check {
            ChannelCheck::Ok => {}
            ChannelCheck::CannotPost => lines.push(format!(
                "❌ Bot is an administrator in target channel <code>{}</code> \
                but is missing the 'Post messages' permission.",
                self.target
            )),
            ChannelCheck::QueryFailed(e) => lines.push(format!(
                "❌ Failed to check target channel <code>{}</code>. \
                Ensure the bot is an administrator with 'Post messages' permission. Error: <code>{}</code>",
                self.target,
                escape_html(e)
            )),
            _ => lines.push(format!(
                "❌ Bot is not an administrator in the target channel <code>{}</code>. \
                Make the bot an administrator and grant it 'Post messages' permission.",
                self.target
            )),
        }

        lines.join("\n\n")
    }
}

/// Checks channel permissions once at startup.
pub struct PermissionVerifier {
    state: Arc<RelayState>,
    transport: Arc<dyn Transport>,
}

impl PermissionVerifier {
    pub fn new(state: Arc<RelayState>, transport: Arc<dyn Transport>) -> Self {
        Self { state, transport }
    }

    /// Query both channels without notifying anyone.
    pub async fn check(&self) -> PermissionReport {
        info!("Starting permission check...");

        let source = self.state.source().clone();
        let source_check = match self.transport.bot_membership(&source).await {
            Ok(membership) => check_source(&membership),
            Err(e) => ChannelCheck::QueryFailed(e.to_string()),
        };
        log_check("source", &source, &source_check);

        let target = self.state.target().clone();
        let target_check = match self.transport.bot_membership(&target).await {
            Ok(membership) => check_target(&membership),
            Err(e) => ChannelCheck::QueryFailed(e.to_string()),
        };
        log_check("target", &target, &target_check);

        PermissionReport {
            source,
            source_check,
            target,
            target_check,
        }
    }

    /// Check both channels and send the owner exactly one summary.
    pub async fn verify_and_report(&self, notifier: &ErrorNotifier) -> PermissionReport {
        let report = self.check().await;
        notifier.send_owner(&report.render()).await;
        report
    }
}

fn log_check(role: &str, channel: &ChannelRef, check: &ChannelCheck) {
    match check {
        ChannelCheck::Ok => info!(role, channel = %channel, "Channel permissions OK"),
        other => error!(role, channel = %channel, problem = ?other, "Channel permission check failed"),
    }
}
