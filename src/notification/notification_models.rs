use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Records created from the dashboard.
pub const SOURCE_INTERNAL: &str = "internal";
/// Records created through the API-key surface.
pub const SOURCE_EXTERNAL_API: &str = "external-api";
/// Marker stored in `sent_by` when no dashboard user is involved.
pub const EXTERNAL_SENDER_ID: &str = "external-api";
/// The only status ever written. Kept as a column so external callers can
/// filter on it without knowing that.
pub const STATUS_SENT: &str = "sent";

/// Outcome of one provider call for one device token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub token: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One dispatch attempt. Append-only: rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[schema(value_type = Object)]
    pub data: Value,
    pub sent_by: String,
    pub sent_by_username: String,
    pub fcm_tokens: Vec<String>,
    #[schema(value_type = Vec<SendResult>)]
    pub results: sqlx::types::Json<Vec<SendResult>>,
    pub success_count: i32,
    pub failure_count: i32,
    pub status: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; id, status and created_at are assigned by the store.
#[derive(Debug)]
pub struct NewNotification {
    pub title: String,
    pub body: String,
    pub data: Value,
    pub sent_by: String,
    pub sent_by_username: String,
    pub fcm_tokens: Vec<String>,
    pub results: Vec<SendResult>,
    pub success_count: i32,
    pub failure_count: i32,
    pub source: String,
    pub sender: Option<String>,
}
