use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::DeliveryError;
use crate::logger;

/// Delivers a plain-text message to the one configured chat.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramSender {
    http: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramSender {
    pub fn new(config: &Config) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(DeliveryError::Transport)?;
        Ok(Self {
            http,
            api_url: config.telegram_api_url.clone(),
            token: config.telegram_token.clone(),
            chat_id: config.telegram_chat_id.clone(),
        })
    }

    fn build_request(&self, text: &str) -> Result<Request, DeliveryError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        self.http
            .post(url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .build()
            .map_err(|err| DeliveryError::Transport(err.without_url()))
    }
}

#[async_trait]
impl ChatSender for TelegramSender {
    async fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        let request = self.build_request(text)?;
        let resp = self
            .http
            .execute(request)
            .await
            .map_err(|err| DeliveryError::Transport(err.without_url()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| DeliveryError::Transport(err.without_url()))?;
        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse { description, .. }) => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
            None => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: body,
            }),
        }
    }
}

/// Fire-and-forget wrapper around a [`ChatSender`]. Delivery problems are
/// logged and never reach the caller as errors.
pub struct Notifier<C> {
    sender: C,
}

impl<C: ChatSender> Notifier<C> {
    pub fn new(sender: C) -> Self {
        Self { sender }
    }

    /// Returns whether the message went out.
    pub async fn notify(&self, text: &str) -> bool {
        match self.sender.send_text(text).await {
            Ok(()) => {
                logger::notification_sent();
                true
            }
            Err(err) => {
                logger::notification_failed(&err);
                false
            }
        }
    }
}
