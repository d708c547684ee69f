//! Telegram notifier.
//!
//! Sends each article link as a plain-text message through the Bot API
//! `sendMessage` method.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::{AppError, Result};

/// Delivers article links to the recipient channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message containing `link`. No retry.
    async fn notify(&self, link: &str) -> Result<()>;
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    credentials: Credentials,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(client: Client, api_base: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            credentials,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.credentials.bot_token,
            method
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, link: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.credentials.chat_id,
            text: link,
        };

        // the request URL carries the bot token, keep it out of errors
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        let status = response.status();
        let reply = response.json::<ApiReply>().await.ok();
        check_reply(status, reply)
    }
}

/// Accept only a 2xx status whose body says `"ok": true`.
///
/// `reply` is `None` when the body wasn't a Bot API JSON object.
fn check_reply(status: StatusCode, reply: Option<ApiReply>) -> Result<()> {
    match reply {
        Some(reply) if status.is_success() && reply.ok => Ok(()),
        Some(ApiReply {
            description: Some(description),
            ..
        }) => Err(AppError::notify(format!(
            "Telegram rejected message ({status}): {description}"
        ))),
        _ => Err(AppError::notify(format!(
            "Telegram rejected message ({status})"
        ))),
    }
}

/// Notifier that only logs, for dry runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, link: &str) -> Result<()> {
        log::info!("[dry run] Would send: {}", link);
        Ok(())
    }
}
