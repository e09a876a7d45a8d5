use anyhow::{anyhow, Context};
use axum::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery of one message to one device token. Implementations return the
/// provider-assigned message id on success.
#[async_trait]
pub trait PushClient: Send + Sync {
    async fn send(&self, token: &str, title: &str, body: &str, data: &Value)
        -> anyhow::Result<String>;
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    to: &'a str,
    notification: FcmNotification<'a>,
    data: &'a Value,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct FcmResponse {
    success: i64,
    failure: i64,
    results: Option<Vec<FcmResult>>,
}

#[derive(Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

/// FCM over its HTTP send endpoint, authenticated with a server key.
/// Built once at startup and shared by every request handler.
#[derive(Clone)]
pub struct FcmClient {
    http: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmClient {
    pub fn new(server_key: String, endpoint: Option<String>) -> anyhow::Result<Self> {
        if server_key.is_empty() {
            return Err(anyhow!("FCM server key is empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build FCM HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_FCM_ENDPOINT.to_string()),
            server_key,
        })
    }

    /// Missing credentials are a deployment error and abort startup rather
    /// than failing every send later.
    pub fn from_env() -> anyhow::Result<Self> {
        let server_key = std::env::var("FCM_SERVER_KEY").context("FCM_SERVER_KEY must be set")?;
        Self::new(server_key, std::env::var("FCM_ENDPOINT").ok())
    }
}

#[async_trait]
impl PushClient for FcmClient {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: &Value,
    ) -> anyhow::Result<String> {
        let request = FcmRequest {
            to: token,
            notification: FcmNotification { title, body },
            data,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&request)
            .send()
            .await
            .context("FCM request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("FCM returned {}: {}", status, detail));
        }

        let parsed: FcmResponse = response
            .json()
            .await
            .context("invalid FCM response body")?;

        let first_result = parsed.results.and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.remove(0))
            }
        });

        if parsed.success >= 1 {
            return Ok(first_result
                .and_then(|result| result.message_id)
                .unwrap_or_default());
        }

        Err(anyhow!(first_result
            .and_then(|result| result.error)
            .unwrap_or_else(|| format!("delivery rejected ({} failures)", parsed.failure))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_server_key() {
        assert!(FcmClient::new(String::new(), None).is_err());
    }

    #[test]
    fn new_uses_default_endpoint_when_unset() {
        let client = FcmClient::new("server-key".to_string(), None).unwrap();
        assert_eq!(client.endpoint, DEFAULT_FCM_ENDPOINT);
    }

    #[test]
    fn new_honors_endpoint_override() {
        let client = FcmClient::new(
            "server-key".to_string(),
            Some("http://localhost:9900/fcm/send".to_string()),
        )
        .unwrap();
        assert_eq!(client.endpoint, "http://localhost:9900/fcm/send");
    }
}
