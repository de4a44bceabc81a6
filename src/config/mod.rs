//! Runtime configuration.
//!
//! Built once at startup from CLI flags and passed by reference into the
//! subscription loop. Credentials may come from the environment instead of
//! flags so they stay out of shell history.

use crate::notify::NotifyTarget;

pub const ENV_BOT_ID: &str = "AUCTION_ALERTS_BOT_ID";
pub const ENV_CHAT_ID: &str = "AUCTION_ALERTS_CHAT_ID";

#[derive(Debug, Clone)]
pub struct Config {
    /// RPC address of the node whose events we subscribe to.
    pub node_url: String,
    /// Telegram destination for alerts.
    pub telegram: NotifyTarget,
}

impl Config {
    /// Build config from CLI flags, overlaying credentials from environment
    /// variables when the flags leave them empty.
    pub fn from_flags(node_url: String, bot_id: String, chat_id: String) -> Self {
        let bot_id = if bot_id.is_empty() {
            std::env::var(ENV_BOT_ID).unwrap_or_default()
        } else {
            bot_id
        };
        let chat_id = if chat_id.is_empty() {
            std::env::var(ENV_CHAT_ID).unwrap_or_default()
        } else {
            chat_id
        };

        Config {
            node_url,
            telegram: NotifyTarget { bot_id, chat_id },
        }
    }
}
