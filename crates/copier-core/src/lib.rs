//! Channel Copier Core - relay logic independent of the Telegram client.
//!
//! - **config**: Environment configuration and channel addressing
//! - **state**: The shared on/off switch and fixed channel/owner ids
//! - **relay**: Source filter, pause check and copy for each channel post
//! - **album**: Buffering of media-group members into one copy
//! - **commands**: Owner-only `/start_forward`, `/stop_forward`, `/status`
//! - **permissions**: Startup membership/permission check
//! - **notifier**: Owner notifications and the global error sink
//! - **transport**: The trait the Telegram adapter implements

pub mod album;
pub mod commands;
pub mod config;
pub mod error;
pub mod notifier;
pub mod permissions;
pub mod post;
pub mod relay;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use album::{AlbumBuffer, AlbumPush, MAX_ALBUM_SIZE};
pub use commands::{welcome_text, CommandHandler, OwnerCommand};
pub use config::{ChannelRef, CopierConfig};
pub use error::{ConfigError, RelayError, Result, TransportError};
pub use notifier::{escape_html, format_diagnostic, ErrorNotifier};
pub use permissions::{ChannelCheck, PermissionReport, PermissionVerifier};
pub use post::{InboundPost, PostKind};
pub use relay::{EventRelay, RelayOutcome};
pub use state::{create_shared_state, RelaySnapshot, RelayState, Toggle};
pub use transport::{Membership, Transport};
