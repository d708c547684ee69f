// src/config.rs

//! Credential loading from the process environment.

use std::env;
use std::fmt;

use crate::error::{AppError, Result};

/// Environment variable holding the destination chat identifier.
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";

/// Telegram recipient and bot credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub chat_id: String,
    pub bot_token: String,
}

impl Credentials {
    pub fn new(chat_id: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            bot_token: bot_token.into(),
        }
    }

    /// Read `CHAT_ID` and `BOT_TOKEN` from the environment.
    ///
    /// Both are required; a missing or blank value is a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    AppError::config(format!("environment variable {key} is not set"))
                })
        };

        Ok(Self {
            chat_id: require(CHAT_ID_VAR)?,
            bot_token: require(BOT_TOKEN_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("chat_id", &self.chat_id)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}
