use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Request, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::FetchError;

/// Source of raw homework status answers, queried with a `from_date` cursor.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.practicum_token.clone(),
        })
    }

    fn build_request(&self, from_date: i64) -> Result<Request, FetchError> {
        self.http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
            .map_err(FetchError::Transport)
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        let request = self.build_request(from_date)?;
        tracing::debug!(from_date, endpoint = %self.endpoint, "Requesting homework statuses");

        let resp = self
            .http
            .execute(request)
            .await
            .map_err(FetchError::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::NonSuccessStatus(status.as_u16()));
        }

        let body = resp.text().await.map_err(FetchError::Transport)?;
        let value = serde_json::from_str(&body).map_err(|err| FetchError::Decode(err.to_string()))?;
        tracing::debug!(from_date, "Homework statuses received");
        Ok(value)
    }
}
