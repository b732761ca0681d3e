use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::error::NotificationError;
use super::transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, Sleeper, TokioSleeper,
};
use crate::message::{display_value, is_truthy};

/// Slack Web API root.
pub const SLACK_API_BASE: &str = "https://slack.com/api";
/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Attempts per API call, first try included. One counter is shared by the
/// 429 and 5xx paths, so a call is retried at most once whatever the cause.
const MAX_ATTEMPTS: u32 = 2;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Upper bound on a server-requested `Retry-After` wait.
pub const MAX_RETRY_AFTER_SECS: u64 = 300;

/// Minimal Slack Web API client for DM notifications.
pub struct SlackNotifier {
    token: String,
    base_url: String,
    timeout: Duration,
    transport: Box<dyn HttpTransport>,
    sleeper: Box<dyn Sleeper>,
}

impl SlackNotifier {
    /// Client using reqwest and the tokio timer.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_transport(token, Box::new(ReqwestTransport::new()), Box::new(TokioSleeper))
    }

    pub fn with_transport(
        token: impl Into<String>,
        transport: Box<dyn HttpTransport>,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        Self {
            token: token.into(),
            base_url: SLACK_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            transport,
            sleeper,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("authorization", format!("Bearer {}", self.token)),
            ("content-type", "application/json; charset=utf-8".to_string()),
        ]
    }

    /// POST `body` to `endpoint`, retrying once on 429 or 5xx, and return the
    /// parsed response of a successful (`ok: true`) call.
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, NotificationError> {
        let url = self.endpoint(endpoint);

        for attempt in 1..=MAX_ATTEMPTS {
            let request = HttpRequest {
                url: url.clone(),
                headers: self.headers(),
                body: body.clone(),
                timeout: self.timeout,
            };
            debug!("{} attempt {}/{}", endpoint, attempt, MAX_ATTEMPTS);

            let response = self
                .transport
                .post(request)
                .await
                .map_err(NotificationError::Transport)?;

            let can_retry = attempt < MAX_ATTEMPTS;

            if response.status == 429 && can_retry {
                let delay = retry_after_delay(response.retry_after.as_deref());
                warn!(
                    "Slack rate limited request to {}, retrying in {} seconds",
                    endpoint,
                    delay.as_secs()
                );
                self.sleeper.sleep(delay).await;
                continue;
            }

            if response.status >= 500 && can_retry {
                warn!(
                    "Slack returned {} for {}, retrying once",
                    response.status, endpoint
                );
                self.sleeper.sleep(DEFAULT_RETRY_DELAY).await;
                continue;
            }

            return Self::validate(response);
        }

        unreachable!()
    }

    /// Status, JSON and `ok` checks on the final response.
    fn validate(response: HttpResponse) -> Result<Value, NotificationError> {
        if !(200..300).contains(&response.status) {
            return Err(NotificationError::HttpStatus {
                status: response.status,
            });
        }

        let data: Value =
            serde_json::from_str(&response.body).map_err(NotificationError::InvalidResponse)?;

        if !data.get("ok").is_some_and(is_truthy) {
            let code = data
                .get("error")
                .map(display_value)
                .unwrap_or_else(|| "unknown_error".to_string());
            return Err(NotificationError::Api(code));
        }

        Ok(data)
    }

    /// Open (or look up) the DM channel with `user_id` and return its ID.
    pub async fn open_dm_channel(&self, user_id: &str) -> Result<String, NotificationError> {
        let data = self
            .post("conversations.open", json!({ "users": user_id }))
            .await?;

        data.get("channel")
            .and_then(|channel| channel.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .ok_or(NotificationError::MissingChannel)
    }

    pub async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), NotificationError> {
        self.post(
            "chat.postMessage",
            json!({ "channel": channel_id, "text": text }),
        )
        .await?;
        Ok(())
    }

    /// Open the DM channel, then post `text` into it.
    pub async fn send_direct_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<(), NotificationError> {
        let channel_id = self.open_dm_channel(user_id).await?;
        debug!("opened DM channel {} for {}", channel_id, user_id);
        self.post_message(&channel_id, text).await
    }
}

/// Delay requested by a 429 response.
///
/// The header is read as seconds (fractions allowed), rounded up and clamped
/// to `1..=MAX_RETRY_AFTER_SECS`. Missing or unusable values give one second.
pub fn retry_after_delay(header: Option<&str>) -> Duration {
    let secs = header
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite())
        .map(|secs| secs.ceil().clamp(1.0, MAX_RETRY_AFTER_SECS as f64) as u64)
        .unwrap_or(1);
    Duration::from_secs(secs)
}
