//! The relay on/off switch and the fixed channel/owner triple.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{ChannelRef, CopierConfig};

/// Shared relay state, accessible from the command handler and the relay.
///
/// Only `enabled` changes after startup; the ids are fixed.
#[derive(Debug)]
pub struct RelayState {
    enabled: AtomicBool,
    source: ChannelRef,
    target: ChannelRef,
    owner_id: u64,
}

/// Result of a `set_enabled` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// The value after the call.
    pub enabled: bool,
    /// Whether the call actually flipped the flag.
    pub changed: bool,
}

/// Point-in-time copy of the relay state, used for `/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySnapshot {
    pub enabled: bool,
    pub source: ChannelRef,
    pub target: ChannelRef,
    pub owner_id: u64,
}

impl RelayState {
    /// Create the state with relaying enabled.
    pub fn new(source: ChannelRef, target: ChannelRef, owner_id: u64) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            source,
            target,
            owner_id,
        }
    }

    /// Create the state from the loaded configuration.
    pub fn from_config(config: &CopierConfig) -> Self {
        Self::new(config.source.clone(), config.target.clone(), config.owner_id)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Set the flag. Setting the current value is a no-op.
    pub fn set_enabled(&self, enabled: bool) -> Toggle {
        let previous = self.enabled.swap(enabled, Ordering::AcqRel);
        Toggle {
            enabled,
            changed: previous != enabled,
        }
    }

    pub fn describe(&self) -> RelaySnapshot {
        RelaySnapshot {
            enabled: self.is_enabled(),
            source: self.source.clone(),
            target: self.target.clone(),
            owner_id: self.owner_id,
        }
    }

    /// Owner-only admission check.
    pub fn is_owner(&self, user_id: u64) -> bool {
        user_id == self.owner_id
    }

    pub fn source(&self) -> &ChannelRef {
        &self.source
    }

    pub fn target(&self) -> &ChannelRef {
        &self.target
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }
}

impl RelaySnapshot {
    /// Human label for the forwarding flag.
    pub fn label(&self) -> &'static str {
        if self.enabled {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// Renders the `/status` reply body (Telegram HTML).
impl fmt::Display for RelaySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🤖 <b>Channel Copier Status</b>")?;
        writeln!(f)?;
        writeln!(f, "<b>Source channel:</b> <code>{}</code>", self.source)?;
        writeln!(f, "<b>Target channel:</b> <code>{}</code>", self.target)?;
        writeln!(f, "<b>Owner ID:</b> <code>{}</code>", self.owner_id)?;
        write!(
            f,
            "<b>Forwarding:</b> {} {}",
            if self.enabled { "✅" } else { "⏸️" },
            self.label()
        )
    }
}

/// Create a shared relay state from configuration.
pub fn create_shared_state(config: &CopierConfig) -> Arc<RelayState> {
    Arc::new(RelayState::from_config(config))
}
