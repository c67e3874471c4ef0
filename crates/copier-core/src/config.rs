//! Runtime configuration for Channel Copier.
//!
//! All settings come from the process environment. The binary loads
//! `.env.local` / `.env` into the environment first, so a dotenv file works
//! the same as exported variables.
//!
//! # Environment Variables
//!
//! Required:
//! - `BOT_TOKEN`: Bot token from @BotFather
//! - `CHANNEL_SOURCE_ID`: Channel to copy from (`-100...` or `@handle`)
//! - `CHANNEL_TARGET_ID`: Channel to copy into (`-100...` or `@handle`)
//! - `OWNER_ID`: Telegram user id allowed to control the bot
//!
//! Optional:
//! - `ALBUM_QUIET_MS`: Quiet period that closes an album (default: 1500)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::Secret;

use crate::error::{ChannelRefError, ConfigError};

/// Environment variable holding the bot token.
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";

/// Environment variable holding the source channel.
pub const SOURCE_CHANNEL_ENV: &str = "CHANNEL_SOURCE_ID";

/// Environment variable holding the target channel.
pub const TARGET_CHANNEL_ENV: &str = "CHANNEL_TARGET_ID";

/// Environment variable holding the owner's user id.
pub const OWNER_ID_ENV: &str = "OWNER_ID";

/// Environment variable overriding the album quiet window.
pub const ALBUM_QUIET_ENV: &str = "ALBUM_QUIET_MS";

/// Default quiet window after the last album member before the album is relayed.
pub const DEFAULT_ALBUM_QUIET_MS: u64 = 1500;

/// A channel, addressed either by numeric chat id or by public username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Numeric chat id, e.g. `-1001234567890`.
    Id(i64),
    /// Public username without the leading `@`.
    Username(String),
}

impl ChannelRef {
    /// Check whether a chat (by id and optional username) is this channel.
    pub fn matches(&self, chat_id: i64, username: Option<&str>) -> bool {
        match self {
            ChannelRef::Id(id) => *id == chat_id,
            ChannelRef::Username(name) => username
                .map(|u| u.trim_start_matches('@').eq_ignore_ascii_case(name))
                .unwrap_or(false),
        }
    }
}

impl FromStr for ChannelRef {
    type Err = ChannelRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Ok(id) = raw.parse::<i64>() {
            return Ok(ChannelRef::Id(id));
        }

        let name = raw.strip_prefix('@').unwrap_or(raw);
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

        if valid {
            Ok(ChannelRef::Username(name.to_string()))
        } else {
            Err(ChannelRefError(s.to_string()))
        }
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "{}", id),
            ChannelRef::Username(name) => write!(f, "@{}", name),
        }
    }
}

/// Fully parsed bot configuration.
#[derive(Clone)]
pub struct CopierConfig {
    /// Bot token; only exposed when building the API client.
    pub bot_token: Secret<String>,
    /// Channel posts are copied from.
    pub source: ChannelRef,
    /// Channel posts are copied into.
    pub target: ChannelRef,
    /// The only user allowed to issue control commands.
    pub owner_id: u64,
    /// Quiet period that marks an album as complete.
    pub album_quiet: Duration,
}

impl fmt::Debug for CopierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopierConfig")
            .field("bot_token", &"[REDACTED]")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("owner_id", &self.owner_id)
            .field("album_quiet", &self.album_quiet)
            .finish()
    }
}

impl CopierConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Every missing or malformed variable is collected so the operator sees
    /// all problems at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();

        let mut required = |key: &str| -> Option<String> {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => Some(value),
                _ => {
                    problems.push(format!("{} is not set", key));
                    None
                }
            }
        };

        let token = required(BOT_TOKEN_ENV);
        let source = required(SOURCE_CHANNEL_ENV);
        let target = required(TARGET_CHANNEL_ENV);
        let owner = required(OWNER_ID_ENV);

        let source = source.and_then(|raw| match raw.parse::<ChannelRef>() {
            Ok(channel) => Some(channel),
            Err(e) => {
                problems.push(format!("{}: {}", SOURCE_CHANNEL_ENV, e));
                None
            }
        });

        let target = target.and_then(|raw| match raw.parse::<ChannelRef>() {
            Ok(channel) => Some(channel),
            Err(e) => {
                problems.push(format!("{}: {}", TARGET_CHANNEL_ENV, e));
                None
            }
        });

        let owner_id = owner.and_then(|raw| match raw.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                problems.push(format!("{}: '{}' is not a numeric user id", OWNER_ID_ENV, raw));
                None
            }
        });

        let album_quiet_ms = match lookup(ALBUM_QUIET_ENV).map(|v| v.trim().to_string()) {
            Some(raw) if !raw.is_empty() => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    problems.push(format!(
                        "{}: '{}' is not a positive number of milliseconds",
                        ALBUM_QUIET_ENV, raw
                    ));
                    DEFAULT_ALBUM_QUIET_MS
                }
            },
            _ => DEFAULT_ALBUM_QUIET_MS,
        };

        match (token, source, target, owner_id) {
            (Some(token), Some(source), Some(target), Some(owner_id)) if problems.is_empty() => {
                Ok(Self {
                    bot_token: Secret::new(token),
                    source,
                    target,
                    owner_id,
                    album_quiet: Duration::from_millis(album_quiet_ms),
                })
            }
            _ => Err(ConfigError::Invalid { problems }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (BOT_TOKEN_ENV, "123:abc"),
            (SOURCE_CHANNEL_ENV, "-100111"),
            (TARGET_CHANNEL_ENV, "@target_channel"),
            (OWNER_ID_ENV, "555"),
        ]
    }

    #[test]
    fn test_parse_channel_ref() {
        assert_eq!("-100111".parse::<ChannelRef>(), Ok(ChannelRef::Id(-100111)));
        assert_eq!(
            "@my_channel".parse::<ChannelRef>(),
            Ok(ChannelRef::Username("my_channel".into()))
        );
        assert_eq!(
            "my_channel".parse::<ChannelRef>(),
            Ok(ChannelRef::Username("my_channel".into()))
        );
        assert!("@".parse::<ChannelRef>().is_err());
        assert!("not a channel".parse::<ChannelRef>().is_err());
        assert!("@_leading".parse::<ChannelRef>().is_err());
    }

    #[test]
    fn test_channel_ref_display() {
        assert_eq!(ChannelRef::Id(-100222).to_string(), "-100222");
        assert_eq!(ChannelRef::Username("news".into()).to_string(), "@news");
    }

    #[test]
    fn test_channel_ref_matches() {
        let by_id = ChannelRef::Id(-100111);
        assert!(by_id.matches(-100111, None));
        assert!(!by_id.matches(-100222, Some("whatever")));

        let by_name = ChannelRef::Username("News_Feed".into());
        assert!(by_name.matches(-1, Some("news_feed")));
        assert!(!by_name.matches(-1, Some("other")));
        assert!(!by_name.matches(-1, None));
    }

    #[test]
    fn test_from_lookup_complete() {
        let config = CopierConfig::from_lookup(lookup(&full_env())).unwrap();
        assert_eq!(config.bot_token.expose_secret(), "123:abc");
        assert_eq!(config.source, ChannelRef::Id(-100111));
        assert_eq!(config.target, ChannelRef::Username("target_channel".into()));
        assert_eq!(config.owner_id, 555);
        assert_eq!(config.album_quiet, Duration::from_millis(DEFAULT_ALBUM_QUIET_MS));
    }

    #[test]
    fn test_from_lookup_reports_all_missing() {
        let err = CopierConfig::from_lookup(lookup(&[])).unwrap_err();
        let problems = err.problems();
        assert_eq!(problems.len(), 4);
        for key in [BOT_TOKEN_ENV, SOURCE_CHANNEL_ENV, TARGET_CHANNEL_ENV, OWNER_ID_ENV] {
            assert!(problems.iter().any(|p| p.contains(key)), "missing {}", key);
        }
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let mut env = full_env();
        env.retain(|(k, _)| *k != OWNER_ID_ENV);
        env.push((OWNER_ID_ENV, "owner"));
        env.push((ALBUM_QUIET_ENV, "0"));

        let err = CopierConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(err.problems().iter().any(|p| p.starts_with(OWNER_ID_ENV)));
        assert!(err.problems().iter().any(|p| p.starts_with(ALBUM_QUIET_ENV)));
    }

    #[test]
    fn test_album_quiet_override() {
        let mut env = full_env();
        env.push((ALBUM_QUIET_ENV, "250"));
        let config = CopierConfig::from_lookup(lookup(&env)).unwrap();
        assert_eq!(config.album_quiet, Duration::from_millis(250));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CopierConfig::from_lookup(lookup(&full_env())).unwrap();
        assert!(!format!("{:?}", config).contains("123:abc"));
    }
}
