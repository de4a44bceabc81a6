//! Telegram delivery for formatted alerts.
//!
//! Delivery is strictly best-effort: a failed send is logged and dropped.
//! There is no retry and no queue, so a flaky Telegram API can never stall
//! the subscription loop for longer than one request timeout.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination for outbound alerts: which bot sends, which chat receives.
#[derive(Debug, Clone, Default)]
pub struct NotifyTarget {
    pub bot_id: String,
    pub chat_id: String,
}

impl NotifyTarget {
    pub fn is_configured(&self) -> bool {
        !self.bot_id.is_empty() && !self.chat_id.is_empty()
    }
}

/// Sink for formatted alert messages.
///
/// Implementations absorb their own failures; `deliver` has no error to
/// return by construction.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, message: &str);
}

/// Sends alerts to a Telegram chat through the Bot API.
pub struct TelegramNotifier {
    target: NotifyTarget,
    client: reqwest::Client,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(target: NotifyTarget) -> Self {
        // timeout requests to avoid unexpected delays from the API side
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("failed to build http client");

        Self {
            target,
            client,
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.target.bot_id)
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn deliver(&self, message: &str) {
        // an incomplete target silently skips delivery, so the listener can
        // run without live credentials
        if !self.target.is_configured() || message.is_empty() {
            return;
        }

        let form = [
            ("chat_id", self.target.chat_id.as_str()),
            ("parse_mode", "html"),
            ("text", message),
        ];

        debug!(chat_id = %self.target.chat_id, "sending telegram message");

        let response = match self.client.post(self.endpoint()).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, chat_id = %self.target.chat_id, "telegram send failed");
                return;
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => {
                if status.is_success() {
                    debug!(%status, body = %body, "telegram response");
                } else {
                    warn!(%status, body = %body, "telegram rejected message");
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read telegram response");
            }
        }
    }
}
