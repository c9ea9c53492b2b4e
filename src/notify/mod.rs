//! Notification sink for link-analysis progress and verdicts.
//!
//! The daemon has no OS notification surface of its own, so notifications
//! always go to the log, and optionally to a configured webhook (the shim or
//! any desktop bridge can subscribe there). Webhook delivery is best-effort;
//! a failed POST is logged and never fails the analysis that produced it.

use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

pub struct Notifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build notification HTTP client");
        Self {
            webhook_url,
            client,
        }
    }

    pub async fn send(&self, title: &str, message: &str) {
        info!(title, message, "notification");

        let Some(url) = &self.webhook_url else {
            return;
        };

        let payload = Notification {
            title: title.to_string(),
            message: message.to_string(),
        };

        match self.client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(status = %response.status(), "notification webhook rejected delivery");
            }
            Err(err) => {
                warn!(error = %err, "notification webhook unreachable");
            }
        }
    }
}
