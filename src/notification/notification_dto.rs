use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::notification_models::{Notification, SendResult};

/// Dashboard send: device tokens always come from the server configuration,
/// so the body only carries display fields. Unknown keys are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendNotificationRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExternalSendRequest {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub body: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    pub tokens: Option<Vec<String>>,
    pub sender: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub success_count: i32,
    pub failure_count: i32,
    pub results: Vec<SendResult>,
    pub notification_id: Uuid,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExternalListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub source: Option<String>,
    pub sender: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListNotificationsResponse {
    pub success: bool,
    pub notifications: Vec<Notification>,
    pub pagination: PaginationMeta,
}

/// External view of a record: no device tokens and no per-token results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalNotification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[schema(value_type = Object)]
    pub data: Value,
    pub sender: String,
    pub source: String,
    pub success_count: i32,
    pub failure_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for ExternalNotification {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            title: notification.title,
            body: notification.body,
            data: notification.data,
            // Internal records carry no sender label; fall back to the
            // dashboard username so the column is never blank.
            sender: notification
                .sender
                .unwrap_or(notification.sent_by_username),
            source: notification.source,
            success_count: notification.success_count,
            failure_count: notification.failure_count,
            status: notification.status,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterEcho {
    pub source: Option<String>,
    pub sender: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExternalListResponse {
    pub success: bool,
    pub notifications: Vec<ExternalNotification>,
    pub pagination: PaginationMeta,
    pub filters: FilterEcho,
}
