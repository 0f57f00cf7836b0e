//! HTTP Backend Client
//!
//! `reqwest` implementation of `RechargeBackend` against the recharge
//! REST API. All requests are JSON with a bounded timeout; the recharge
//! submission carries the session bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use mobicomm_core::{
    Category, InvoiceRequest, MobileNumber, MobileValidation, Plan, RechargeBackend,
    RechargeError, RechargeRequest, Result, SessionToken,
};

use crate::config::BackendConfig;

/// Wire body of `POST /api/auth/validate-mobile`
#[derive(Debug, Serialize)]
struct ValidateMobileBody<'a> {
    username: &'a str,
}

/// HTTP client for the recharge backend
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a new client from configuration
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RechargeError::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(BackendConfig::from_env())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map a transport failure to the flow error taxonomy
    fn transport(err: reqwest::Error) -> RechargeError {
        if err.is_timeout() {
            RechargeError::Network("request timed out".into())
        } else {
            RechargeError::Network(err.to_string())
        }
    }

    /// Turn a non-success status into an error carrying the response body
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "backend request failed");

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            Err(RechargeError::Auth(message))
        } else {
            Err(RechargeError::Backend { status: status.as_u16(), message })
        }
    }
}

#[async_trait]
impl RechargeBackend for HttpBackend {
    async fn validate_mobile(&self, mobile: &MobileNumber) -> Result<MobileValidation> {
        let response = self
            .client
            .post(self.url("/api/auth/validate-mobile"))
            .json(&ValidateMobileBody { username: mobile.as_str() })
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(Self::transport)
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let response = self
            .client
            .get(self.url("/api/categories"))
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(Self::transport)
    }

    async fn plans(&self, category_id: i64) -> Result<Vec<Plan>> {
        let response = self
            .client
            .get(self.url("/api/plans"))
            .query(&[("categoryId", category_id)])
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(Self::transport)
    }

    async fn submit_recharge(
        &self,
        token: &SessionToken,
        request: &RechargeRequest,
    ) -> Result<Value> {
        tracing::info!(
            plan_id = request.plan_id,
            amount = %request.amount,
            "submitting recharge transaction"
        );

        let response = self
            .client
            .post(self.url("/api/transactions/recharge"))
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(Self::transport)
    }

    async fn send_invoice(&self, request: &InvoiceRequest) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/email/send-invoice"))
            .json(request)
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check(response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "mobicomm-rest"
    }
}
