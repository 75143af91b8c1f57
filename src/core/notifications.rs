use crate::core::settings::TelegramSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    send_url: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(settings: &TelegramSettings, token: &str, chat_id: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                settings.api_base.trim_end_matches('/'),
                token
            ),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.send_url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            // reqwest errors embed the URL, which carries the bot token
            .map_err(|e| anyhow::anyhow!("Failed to reach Telegram: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read Telegram reply: {}", e.without_url()))?;

        if !status.is_success() {
            anyhow::bail!("Telegram API error: {} - {}", status, body);
        }

        let reply: BotApiReply =
            serde_json::from_str(&body).context("Failed to parse Telegram reply")?;
        if !reply.ok {
            anyhow::bail!(
                "Telegram rejected message: {}",
                reply.description.unwrap_or_default()
            );
        }

        Ok(())
    }
}

/// Sends `text`, logging the outcome. Delivery failures never propagate.
pub async fn deliver(notifier: &dyn Notifier, text: &str) -> bool {
    match notifier.send(text).await {
        Ok(()) => {
            tracing::info!("Sent notification");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send notification");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{serve_once, serve_raw};

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _text: &str) -> Result<()> {
            anyhow::bail!("chat not found")
        }
    }

    fn notifier_for(base: &str) -> TelegramNotifier {
        let settings = TelegramSettings {
            api_base: format!("{}/", base),
            request_timeout_secs: 5,
        };
        TelegramNotifier::new(&settings, "123:abc", "42").unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_chat_and_text() {
        let (base, request) = serve_once(200, r#"{"ok": true, "result": {}}"#).await;

        notifier_for(&base).send("Привет").await.unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /bot123:abc/sendMessage "));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["chat_id"], "42");
        assert_eq!(payload["text"], "Привет");
    }

    #[tokio::test]
    async fn test_send_rejected_by_api() {
        let (base, _request) = serve_once(
            400,
            r#"{"ok": false, "description": "Bad Request: chat not found"}"#,
        )
        .await;

        let err = notifier_for(&base).send("hi").await.unwrap_err();
        assert!(err.to_string().contains("chat not found"));
    }

    #[tokio::test]
    async fn test_send_ok_false() {
        let (base, _request) = serve_once(200, r#"{"ok": false, "description": "blocked"}"#).await;

        let err = notifier_for(&base).send("hi").await.unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[tokio::test]
    async fn test_send_truncated_reply() {
        let (base, _request) = serve_raw(
            "HTTP/1.1 200 OK\r\ncontent-length: 64\r\nconnection: close\r\n\r\n{\"ok\"".to_string(),
        )
        .await;

        let err = notifier_for(&base).send("hi").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to read Telegram reply"), "{message}");
        assert!(!message.contains("123:abc"));
    }

    #[tokio::test]
    async fn test_deliver_swallows_failure() {
        assert!(!deliver(&FailingNotifier, "hi").await);
    }
}
