use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{error, info};

use crate::{
    card::render_payload,
    config::Config,
    model::{Location, TodayMenu},
};

use super::{Notifier, PostOutcome};

/// Posts adaptive cards to a chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    webhook_url: String,
    site_url: String,
    testing: bool,
    http: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>, site_url: impl Into<String>, testing: bool) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            site_url: site_url.into(),
            testing,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.webhook_url.clone(), config.menu_site_url.clone(), config.testing)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn post(&self, location: &Location, menu: &TodayMenu) -> PostOutcome {
        let payload = render_payload(location, menu, &self.site_url, self.testing);

        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(e) => {
                error!(location = %location.name, error = %e, "failed to serialize notification");
                return PostOutcome::Failed { reason: e.to_string() };
            }
        };

        let res = self
            .http
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match res {
            Ok(res) if res.status().is_success() => {
                info!(location = %location.name, date = %menu.date, "menu posted");
                PostOutcome::Delivered { status: res.status() }
            }
            Ok(res) => {
                let status = res.status();
                error!(
                    location = %location.name,
                    status = status.as_u16(),
                    reason = status.canonical_reason().unwrap_or(""),
                    "webhook rejected notification"
                );
                PostOutcome::Rejected { status }
            }
            Err(e) => {
                error!(location = %location.name, error = %e, "failed to send notification");
                PostOutcome::Failed { reason: e.to_string() }
            }
        }
    }
}
