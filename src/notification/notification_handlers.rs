use axum::{
    extract::{Query, State},
    Extension, Json,
};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::auth::AuthUser,
    state::AppState,
};
use super::{
    notification_dto::{
        ExternalListQuery, ExternalListResponse, ExternalNotification, ExternalSendRequest,
        FilterEcho, ListNotificationsResponse, ListQuery, PaginationMeta,
        SendNotificationRequest, SendNotificationResponse,
    },
    notification_models::{Notification, EXTERNAL_SENDER_ID, SOURCE_EXTERNAL_API, SOURCE_INTERNAL},
    notification_repository::{normalize_page_params, total_pages, NotificationFilters},
    notification_service::DispatchInput,
};

/// Get the notification history for the dashboard
#[utoipa::path(
    get,
    path = "/notifications",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<i64>, Query, description = "Records per page, capped at 100")
    ),
    responses(
        (status = 200, description = "Paginated history, newest first", body = ListNotificationsResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Invalid secret key")
    ),
    security(("bearer_auth" = [], "secret_key" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListNotificationsResponse>> {
    let (page, limit) = normalize_page_params(query.page, query.limit);
    let filters = NotificationFilters::default();

    let total = state.notification_repository.count(&filters).await?;
    let notifications = state
        .notification_repository
        .list(&filters, page, limit)
        .await?;

    Ok(Json(ListNotificationsResponse {
        success: true,
        notifications,
        pagination: PaginationMeta {
            page,
            limit,
            total,
            pages: total_pages(total, limit),
        },
    }))
}

/// Send a push notification to the configured device tokens
#[utoipa::path(
    post,
    path = "/send-notification",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Dispatch attempted for every configured token", body = SendNotificationResponse),
        (status = 400, description = "No device tokens configured"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Invalid secret key")
    ),
    security(("bearer_auth" = [], "secret_key" = [])),
    tag = "notifications"
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SendNotificationRequest>,
) -> Result<Json<SendNotificationResponse>> {
    let tokens = state.config.default_fcm_tokens.clone();
    if tokens.is_empty() {
        return Err(AppError::BadRequest(
            "No FCM tokens found in environment variables".to_string(),
        ));
    }

    let title = text_or(payload.title, "Notification");
    let body = text_or(payload.body, "You have a new notification");
    let data = payload.data.unwrap_or_else(|| serde_json::json!({}));

    let notification = state
        .notification_service
        .send_and_record(DispatchInput {
            title,
            body,
            data,
            tokens,
            sent_by: user.id.to_string(),
            sent_by_username: user.username,
            source: SOURCE_INTERNAL.to_string(),
            sender: None,
        })
        .await?;

    Ok(Json(send_response(notification)))
}

/// Get the notification history, redacted for third parties
#[utoipa::path(
    get,
    path = "/external/notifications",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<i64>, Query, description = "Records per page, capped at 100"),
        ("source" = Option<String>, Query, description = "Filter by record source"),
        ("sender" = Option<String>, Query, description = "Filter by sender label"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Paginated redacted history", body = ExternalListResponse),
        (status = 401, description = "Invalid API key")
    ),
    security(("api_key" = [])),
    tag = "external"
)]
pub async fn external_list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ExternalListQuery>,
) -> Result<Json<ExternalListResponse>> {
    let (page, limit) = normalize_page_params(query.page, query.limit);
    let filters = NotificationFilters {
        source: query.source.clone(),
        sender: query.sender.clone(),
        status: query.status.clone(),
    };

    let total = state.notification_repository.count(&filters).await?;
    let notifications: Vec<ExternalNotification> = state
        .notification_repository
        .list(&filters, page, limit)
        .await?
        .into_iter()
        .map(ExternalNotification::from)
        .collect();

    Ok(Json(ExternalListResponse {
        success: true,
        notifications,
        pagination: PaginationMeta {
            page,
            limit,
            total,
            pages: total_pages(total, limit),
        },
        filters: FilterEcho {
            source: query.source,
            sender: query.sender,
            status: query.status,
        },
    }))
}

/// Send a push notification on behalf of a third-party application
#[utoipa::path(
    post,
    path = "/external/send-notification",
    request_body = ExternalSendRequest,
    responses(
        (status = 200, description = "Dispatch attempted for every target token", body = SendNotificationResponse),
        (status = 400, description = "Missing title or body, or no tokens available"),
        (status = 401, description = "Invalid API key")
    ),
    security(("api_key" = [])),
    tag = "external"
)]
pub async fn external_send_notification(
    State(state): State<AppState>,
    Json(payload): Json<ExternalSendRequest>,
) -> Result<Json<SendNotificationResponse>> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Title and body are required".to_string()))?;

    let tokens = resolve_tokens(payload.tokens, &state.config.default_fcm_tokens);
    if tokens.is_empty() {
        return Err(AppError::BadRequest(
            "No FCM tokens found. Set FCM_TOKEN environment variable or provide tokens in request body."
                .to_string(),
        ));
    }

    let title = payload.title.unwrap_or_default();
    let body = payload.body.unwrap_or_default();
    let data = payload.data.unwrap_or_else(|| serde_json::json!({}));
    let sent_by_username = text_or(payload.sender.clone(), "external-application");
    let sender = text_or(payload.sender, "Unknown App");

    let notification = state
        .notification_service
        .send_and_record(DispatchInput {
            title,
            body,
            data,
            tokens,
            sent_by: EXTERNAL_SENDER_ID.to_string(),
            sent_by_username,
            source: SOURCE_EXTERNAL_API.to_string(),
            sender: Some(sender),
        })
        .await?;

    Ok(Json(send_response(notification)))
}

/// Caller-supplied tokens win over the configured defaults.
fn resolve_tokens(requested: Option<Vec<String>>, defaults: &[String]) -> Vec<String> {
    match requested {
        Some(tokens) if !tokens.is_empty() => {
            tracing::info!("external send targeting {} tokens from request", tokens.len());
            tokens
        }
        _ => {
            tracing::info!(
                "external send targeting {} tokens from environment",
                defaults.len()
            );
            defaults.to_vec()
        }
    }
}

/// A missing or empty value falls back to the stock text, matching what
/// the dashboard shows for untitled sends.
fn text_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => fallback.to_string(),
    }
}

fn send_response(notification: Notification) -> SendNotificationResponse {
    SendNotificationResponse {
        success: true,
        success_count: notification.success_count,
        failure_count: notification.failure_count,
        message: format!(
            "Successfully sent {} notifications, {} failed",
            notification.success_count, notification.failure_count
        ),
        results: notification.results.0,
        notification_id: notification.id,
    }
}
