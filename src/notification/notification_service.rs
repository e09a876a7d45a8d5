use crate::error::Result;
use crate::push::PushClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::notification_models::{NewNotification, Notification, SendResult};
use super::notification_repository::NotificationRepository;

/// Aggregate of one dispatch: one entry per token, in token order.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub results: Vec<SendResult>,
    pub success_count: i32,
    pub failure_count: i32,
}

/// Leading characters of a token for log lines; full tokens never reach
/// the logs.
fn token_preview(token: &str) -> String {
    token.chars().take(20).collect()
}

/// Deliver to every token in order, one provider call at a time. A failing
/// token is recorded and the loop moves on; this function itself cannot
/// fail.
pub async fn dispatch(
    push: &dyn PushClient,
    title: &str,
    body: &str,
    data: &Value,
    tokens: &[String],
) -> DispatchOutcome {
    let mut results = Vec::with_capacity(tokens.len());
    let mut success_count = 0;
    let mut failure_count = 0;

    for token in tokens {
        match push.send(token, title, body, data).await {
            Ok(message_id) => {
                info!("sent notification to token {}...", token_preview(token));
                results.push(SendResult {
                    token: token.clone(),
                    success: true,
                    message_id: Some(message_id),
                    error: None,
                });
                success_count += 1;
            }
            Err(error) => {
                warn!(
                    "failed to send to token {}...: {}",
                    token_preview(token),
                    error
                );
                results.push(SendResult {
                    token: token.clone(),
                    success: false,
                    message_id: None,
                    error: Some(error.to_string()),
                });
                failure_count += 1;
            }
        }
    }

    DispatchOutcome {
        results,
        success_count,
        failure_count,
    }
}

/// Everything needed to dispatch one notification and record the attempt.
#[derive(Debug)]
pub struct DispatchInput {
    pub title: String,
    pub body: String,
    pub data: Value,
    pub tokens: Vec<String>,
    pub sent_by: String,
    pub sent_by_username: String,
    pub source: String,
    pub sender: Option<String>,
}

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    push: Arc<dyn PushClient>,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, push: Arc<dyn PushClient>) -> Self {
        Self { repo, push }
    }

    /// Push to every token, then append the outcome to history. Only the
    /// insert can fail; per-token delivery errors are part of the recorded
    /// outcome, not errors of this call.
    pub async fn send_and_record(&self, input: DispatchInput) -> Result<Notification> {
        let outcome = dispatch(
            self.push.as_ref(),
            &input.title,
            &input.body,
            &input.data,
            &input.tokens,
        )
        .await;

        info!(
            "dispatch complete: {} sent, {} failed ({} tokens)",
            outcome.success_count,
            outcome.failure_count,
            input.tokens.len()
        );

        self.repo
            .insert(NewNotification {
                title: input.title,
                body: input.body,
                data: input.data,
                sent_by: input.sent_by,
                sent_by_username: input.sent_by_username,
                fcm_tokens: input.tokens,
                results: outcome.results,
                success_count: outcome.success_count,
                failure_count: outcome.failure_count,
                source: input.source,
                sender: input.sender,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::async_trait;
    use serde_json::json;

    /// Provider stub: tokens containing "bad" are rejected.
    struct FakePush;

    #[async_trait]
    impl PushClient for FakePush {
        async fn send(
            &self,
            token: &str,
            _title: &str,
            _body: &str,
            _data: &Value,
        ) -> anyhow::Result<String> {
            if token.contains("bad") {
                anyhow::bail!("NotRegistered");
            }
            Ok(format!("mid-{}", token))
        }
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|token| token.to_string()).collect()
    }

    #[tokio::test]
    async fn counts_always_sum_to_token_count() {
        let outcome = dispatch(
            &FakePush,
            "title",
            "body",
            &json!({}),
            &tokens(&["ok-1", "bad-1", "ok-2"]),
        )
        .await;
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 1);
        assert_eq!(outcome.success_count + outcome.failure_count, 3);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_batch() {
        let outcome = dispatch(
            &FakePush,
            "title",
            "body",
            &json!({}),
            &tokens(&["bad-1", "ok-2"]),
        )
        .await;
        assert!(!outcome.results[0].success);
        assert!(outcome.results[1].success);
    }

    #[tokio::test]
    async fn all_failures_still_produce_a_full_outcome() {
        let outcome = dispatch(
            &FakePush,
            "title",
            "body",
            &json!({}),
            &tokens(&["bad-1", "bad-2"]),
        )
        .await;
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failure_count, 2);
        assert_eq!(outcome.results[0].error.as_deref(), Some("NotRegistered"));
        assert!(outcome.results[0].message_id.is_none());
    }

    #[tokio::test]
    async fn results_keep_token_order_and_message_ids() {
        let outcome = dispatch(
            &FakePush,
            "title",
            "body",
            &json!({}),
            &tokens(&["x", "y"]),
        )
        .await;
        assert_eq!(outcome.results[0].token, "x");
        assert_eq!(outcome.results[0].message_id.as_deref(), Some("mid-x"));
        assert_eq!(outcome.results[1].token, "y");
        assert_eq!(outcome.results[1].message_id.as_deref(), Some("mid-y"));
    }

    #[tokio::test]
    async fn empty_token_list_yields_empty_outcome() {
        let outcome = dispatch(&FakePush, "title", "body", &json!({}), &[]).await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failure_count, 0);
    }

    #[test]
    fn token_preview_truncates_long_tokens() {
        let long = "a".repeat(150);
        assert_eq!(token_preview(&long).len(), 20);
        assert_eq!(token_preview("short"), "short");
    }
}
