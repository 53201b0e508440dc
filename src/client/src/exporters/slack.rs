use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use gaia_common::config::Config;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::alert::{Alert, AlertSink};

#[derive(Serialize, Clone, Debug)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts alerts to a Slack-compatible incoming webhook.
pub struct SlackNotifier {
    endpoint: String,
    client: Client,
}

impl SlackNotifier {
    pub fn try_new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build webhook HTTP client")?;

        Ok(SlackNotifier {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::try_new(&config.slack_webhook_url, config.webhook_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AlertSink for SlackNotifier {
    async fn send(&self, alert: &Alert) -> Result<()> {
        let payload = WebhookPayload {
            text: &alert.message,
        };

        info!("Sending {} alert to webhook", alert.level);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {:?}", e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_client_error() || status.is_server_error() {
            bail!("webhook responded with {status}: {body}");
        }

        debug!("Webhook response ({status}): {body}");
        Ok(())
    }
}
