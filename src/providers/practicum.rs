use crate::core::error::{BotError, Result};
use crate::core::models::Cursor;
use crate::core::settings::ApiSettings;
use crate::providers::StatusSource;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(settings: &ApiSettings, token: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    fn name(&self) -> &'static str {
        "Practicum"
    }

    async fn fetch(&self, cursor: Cursor) -> Result<Value> {
        tracing::debug!(from_date = cursor.timestamp(), "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor.timestamp())])
            .send()
            .await
            .map_err(BotError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Status API returned an error code");
            return Err(BotError::Endpoint {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(BotError::Transport)?;
        serde_json::from_str(&body).map_err(BotError::MalformedResponse)
    }
}
