use crate::error::Result;
use sqlx::PgPool;

use super::notification_models::{NewNotification, Notification, STATUS_SENT};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Conjunction of exact-match filters; unset fields do not constrain.
#[derive(Debug, Default, Clone)]
pub struct NotificationFilters {
    pub source: Option<String>,
    pub sender: Option<String>,
    pub status: Option<String>,
}

/// Normalize page/limit to usable values: defaults for absent or
/// non-positive input, limit capped at MAX_LIMIT.
pub fn normalize_page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = match page {
        Some(page) if page >= 1 => page,
        _ => DEFAULT_PAGE,
    };
    let limit = match limit {
        Some(limit) if limit >= 1 => limit.min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    };
    (page, limit)
}

/// ceil(total / limit); an empty table has zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

/// OFFSET for a 1-based page; saturates so an oversized page number asks
/// for an empty page instead of overflowing.
fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Append WHERE clauses for the set filters and return the bind values in
/// placeholder order. Shared by `list` and `count` so the two always agree.
fn push_filters(query: &mut String, filters: &NotificationFilters) -> Vec<String> {
    let mut binds = Vec::new();
    for (column, value) in [
        ("source", &filters.source),
        ("sender", &filters.sender),
        ("status", &filters.status),
    ] {
        if let Some(value) = value {
            if binds.is_empty() {
                query.push_str(" WHERE ");
            } else {
                query.push_str(" AND ");
            }
            binds.push(value.clone());
            query.push_str(&format!("{} = ${}", column, binds.len()));
        }
    }
    binds
}

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The only write the store offers. `status` is fixed at insert time.
    pub async fn insert(&self, new: NewNotification) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications
                (title, body, data, sent_by, sent_by_username, fcm_tokens,
                 results, success_count, failure_count, status, source, sender)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.body)
        .bind(&new.data)
        .bind(&new.sent_by)
        .bind(&new.sent_by_username)
        .bind(&new.fcm_tokens)
        .bind(sqlx::types::Json(&new.results))
        .bind(new.success_count)
        .bind(new.failure_count)
        .bind(STATUS_SENT)
        .bind(&new.source)
        .bind(&new.sender)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn list(
        &self,
        filters: &NotificationFilters,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let mut query = "SELECT * FROM notifications".to_string();
        let binds = push_filters(&mut query, filters);
        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2
        ));

        let mut db_query = sqlx::query_as::<_, Notification>(&query);
        for value in binds {
            db_query = db_query.bind(value);
        }

        let notifications = db_query
            .bind(limit)
            .bind(page_offset(page, limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(notifications)
    }

    pub async fn count(&self, filters: &NotificationFilters) -> Result<i64> {
        let mut query = "SELECT COUNT(*) FROM notifications".to_string();
        let binds = push_filters(&mut query, filters);

        let mut db_query = sqlx::query_scalar::<_, i64>(&query);
        for value in binds {
            db_query = db_query.bind(value);
        }

        let total = db_query.fetch_one(&self.pool).await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_when_absent() {
        assert_eq!(normalize_page_params(None, None), (1, 10));
    }

    #[test]
    fn normalize_defaults_when_non_positive() {
        assert_eq!(normalize_page_params(Some(0), Some(0)), (1, 10));
        assert_eq!(normalize_page_params(Some(-3), Some(-10)), (1, 10));
    }

    #[test]
    fn normalize_clamps_oversized_limit() {
        assert_eq!(normalize_page_params(Some(2), Some(5000)), (2, 100));
        assert_eq!(normalize_page_params(None, Some(100)), (1, 100));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
    }

    #[test]
    fn push_filters_builds_conjunction_in_order() {
        let filters = NotificationFilters {
            source: Some("external-api".to_string()),
            sender: Some("AppX".to_string()),
            status: Some("sent".to_string()),
        };
        let mut query = "SELECT * FROM notifications".to_string();
        let binds = push_filters(&mut query, &filters);
        assert_eq!(
            query,
            "SELECT * FROM notifications WHERE source = $1 AND sender = $2 AND status = $3"
        );
        assert_eq!(binds, vec!["external-api", "AppX", "sent"]);
    }

    #[test]
    fn push_filters_skips_unset_fields() {
        let filters = NotificationFilters {
            source: None,
            sender: Some("AppX".to_string()),
            status: None,
        };
        let mut query = "SELECT COUNT(*) FROM notifications".to_string();
        let binds = push_filters(&mut query, &filters);
        assert_eq!(query, "SELECT COUNT(*) FROM notifications WHERE sender = $1");
        assert_eq!(binds, vec!["AppX"]);
    }

    #[test]
    fn push_filters_leaves_query_alone_when_empty() {
        let mut query = "SELECT * FROM notifications".to_string();
        let binds = push_filters(&mut query, &NotificationFilters::default());
        assert_eq!(query, "SELECT * FROM notifications");
        assert!(binds.is_empty());
    }

    #[test]
    fn offset_follows_page_arithmetic() {
        let (page, limit) = normalize_page_params(Some(3), Some(10));
        assert_eq!(page_offset(page, limit), 20);
        assert_eq!(page_offset(1, 10), 0);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        // Page numbers are caller-controlled and pass normalization as-is.
        let (page, limit) = normalize_page_params(Some(i64::MAX), None);
        assert_eq!((page, limit), (i64::MAX, 10));
        assert_eq!(page_offset(page, limit), i64::MAX);
        assert_eq!(page_offset(i64::MAX, 1), i64::MAX - 1);
    }
}
