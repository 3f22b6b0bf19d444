use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::backend::Session;
use crate::shared::types::{ApiEnvelope, Meta};

/// Error body returned alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the ServiceHub REST backend.
///
/// Endpoint wrappers live with their features (`TicketSource`,
/// `PaymentSource` impls); this type owns transport, auth headers and
/// status mapping.
pub struct ServiceHubClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ServiceHubClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: &str,
    ) -> Result<(T, Option<Meta>)> {
        let token = session.bearer()?;
        let request = self.http_client.get(url).bearer_auth(token);
        self.execute(request, url).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: &Session,
        url: &str,
        body: &B,
    ) -> Result<(T, Option<Meta>)> {
        let token = session.bearer()?;
        let request = self.http_client.post(url).bearer_auth(token).json(body);
        self.execute(request, url).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<(T, Option<Meta>)> {
        let request_id = Uuid::now_v7();
        tracing::debug!("Requesting {} (request_id={})", url, request_id);

        let response = request
            .header("X-Request-Id", request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request to {} failed: {}", url, e);
                AppError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(AppError::from)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Auth(format!(
                "Backend refused credential: HTTP {}",
                status
            )));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message.or(e.error))
                .unwrap_or_default();
            tracing::warn!(
                "Backend rejected {} (request_id={}): HTTP {} {}",
                url,
                request_id,
                status,
                message
            );
            return Err(AppError::BackendRejection {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to decode response from {}: {}", url, e);
            AppError::Decode(e.to_string())
        })?;

        envelope.into_result(status.as_u16())
    }
}
