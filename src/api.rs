use crate::errors::ClientError;
use crate::models::{
    EarnTemplateRequest, EarnTemplateResponse, SessionProgress, TimerStatus,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const START: &str = "/start";
pub const PAUSE: &str = "/pause";
pub const RESET: &str = "/reset";
pub const TIMER_STATUS: &str = "/api/timer-status";
pub const SESSION_PROGRESS: &str = "/api/session-progress";
pub const EARN_TEMPLATE: &str = "/api/earn-template";

/// Remote source of truth for the timer. Each call is a single request with
/// no retries; the controller decides what to do with failures.
pub trait TimerApi: Send + Sync + 'static {
    fn start(&self) -> impl Future<Output = Result<TimerStatus, ClientError>> + Send;
    fn pause(&self) -> impl Future<Output = Result<TimerStatus, ClientError>> + Send;
    fn reset(&self) -> impl Future<Output = Result<TimerStatus, ClientError>> + Send;
    fn status(&self) -> impl Future<Output = Result<TimerStatus, ClientError>> + Send;
    fn session_progress(&self)
    -> impl Future<Output = Result<SessionProgress, ClientError>> + Send;
    fn earn_template(
        &self,
        template_id: u32,
    ) -> impl Future<Output = Result<EarnTemplateResponse, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTimerApi {
    client: Client,
    base_url: String,
}

impl HttpTimerApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T>(&self, endpoint: &'static str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        decode(endpoint, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { endpoint, status });
    }
    response
        .json()
        .await
        .map_err(|source| ClientError::Transport { endpoint, source })
}

impl TimerApi for HttpTimerApi {
    async fn start(&self) -> Result<TimerStatus, ClientError> {
        self.get_json(START).await
    }

    async fn pause(&self) -> Result<TimerStatus, ClientError> {
        self.get_json(PAUSE).await
    }

    async fn reset(&self) -> Result<TimerStatus, ClientError> {
        self.get_json(RESET).await
    }

    async fn status(&self) -> Result<TimerStatus, ClientError> {
        self.get_json(TIMER_STATUS).await
    }

    async fn session_progress(&self) -> Result<SessionProgress, ClientError> {
        self.get_json(SESSION_PROGRESS).await
    }

    async fn earn_template(&self, template_id: u32) -> Result<EarnTemplateResponse, ClientError> {
        let response = self
            .client
            .post(self.url(EARN_TEMPLATE))
            .json(&EarnTemplateRequest { template_id })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: EARN_TEMPLATE,
                source,
            })?;
        decode(EARN_TEMPLATE, response).await
    }
}
