use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::Config,
    error::FetchError,
    model::{Location, WeeklyMenuResponse},
};

use super::MenuSource;

/// Client for the Food&Co weekly menu API.
#[derive(Debug, Clone)]
pub struct FoodAndCoClient {
    api_url: String,
    language_code: String,
    http: Client,
}

impl FoodAndCoClient {
    pub fn new(api_url: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            language_code: language_code.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.menu_api_url.clone(), config.language_code.clone())
    }
}

#[async_trait]
impl MenuSource for FoodAndCoClient {
    async fn weekly_menu(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<WeeklyMenuResponse, FetchError> {
        let date = date.format("%Y-%m-%d").to_string();

        debug!(location = %location.name, restaurant_id = %location.restaurant_id, %date, "fetching weekly menu");

        let res = self
            .http
            .get(&self.api_url)
            .query(&[
                ("restaurantId", location.restaurant_id.as_str()),
                ("languageCode", self.language_code.as_str()),
                ("date", date.as_str()),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Request {
                location: location.name.clone(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Request {
            location: location.name.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.name.clone(),
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            location: location.name.clone(),
            source,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
