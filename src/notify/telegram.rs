//! Telegram notifier client

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use tracing::debug;

use crate::config::TelegramConfig;

/// Notifier error types
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("failed to read image: {0}")]
    ImageRead(#[from] std::io::Error),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("upstream status {status}")]
    Upstream { status: u16 },
}

/// Client for the bot `sendPhoto` endpoint
pub struct TelegramNotifier {
    http: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    /// Create a new notifier
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Send `caption` with the image at `path` attached.
    ///
    /// One multipart POST carrying `chat_id`, `caption` and the binary
    /// `photo` part. Any non-2xx status is an error; the caller decides
    /// whether that failure is fatal for its own flow.
    pub async fn send_photo(&self, caption: &str, path: &Path) -> Result<(), NotifyError> {
        let token = self
            .config
            .bot_token
            .as_deref()
            .ok_or(NotifyError::MissingCredential("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = self
            .config
            .chat_id
            .as_deref()
            .ok_or(NotifyError::MissingCredential("TELEGRAM_CHAT_ID"))?;

        let url = format!(
            "{}/bot{}/sendPhoto",
            self.config.api_base.trim_end_matches('/'),
            token
        );

        let photo = tokio::fs::read(path).await?;
        debug!(chat_id, bytes = photo.len(), "sending photo notification");

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part(
                "photo",
                Part::bytes(photo)
                    .file_name("photo.jpg")
                    .mime_str("image/jpeg")
                    .map_err(|e| NotifyError::RequestFailed(e.to_string()))?,
            );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(e.to_string())
                } else {
                    NotifyError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use uuid::Uuid;

    fn test_config(api_base: String) -> TelegramConfig {
        TelegramConfig {
            api_base,
            bot_token: Some("TEST_TOKEN".to_string()),
            chat_id: Some("4242".to_string()),
            ..TelegramConfig::default()
        }
    }

    async fn temp_image(bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pollution-watch-photo-{}.jpg", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_send_photo_posts_caption_and_chat_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTEST_TOKEN/sendPhoto")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("(?s).*name=\"chat_id\".*4242.*".to_string()),
                Matcher::Regex("(?s).*name=\"caption\".*hello there.*".to_string()),
                Matcher::Regex("(?s).*name=\"photo\".*".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let path = temp_image(b"fake photo bytes").await;
        let notifier = TelegramNotifier::new(test_config(server.url())).unwrap();

        notifier.send_photo("hello there", &path).await.unwrap();

        mock.assert_async().await;
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_upstream_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/botTEST_TOKEN/sendPhoto")
            .with_status(403)
            .create_async()
            .await;

        let path = temp_image(b"fake photo bytes").await;
        let notifier = TelegramNotifier::new(test_config(server.url())).unwrap();

        let result = notifier.send_photo("caption", &path).await;
        assert!(matches!(result, Err(NotifyError::Upstream { status: 403 })));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_token_is_local_error() {
        let mut config = TelegramConfig::default();
        config.chat_id = Some("4242".to_string());

        let path = temp_image(b"fake photo bytes").await;
        let notifier = TelegramNotifier::new(config).unwrap();

        let result = notifier.send_photo("caption", &path).await;
        assert!(matches!(
            result,
            Err(NotifyError::MissingCredential("TELEGRAM_BOT_TOKEN"))
        ));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
