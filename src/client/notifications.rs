// Notification list and mark-read wrappers.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::admin::Pagination;
use super::auth::Ack;
use super::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationsPage {
    pub items: Vec<NotificationItem>,
    pub meta: Pagination,
    pub unread_count: u64,
}

#[derive(Debug, Deserialize)]
struct NotificationsData {
    notifications: Vec<NotificationItem>,
    meta: Pagination,
    unread_count: Option<u64>,
}

/// Fetch one page of notifications. When the backend omits `unread_count`,
/// fall back to counting the unread items on this page.
pub async fn fetch_notifications_page(
    client: &ApiClient,
    page: u32,
    per_page: u32,
) -> Result<NotificationsPage, ClientError> {
    let data: NotificationsData = client
        .get(&format!("/v1/notifications?page={page}&per_page={per_page}"))
        .await?;

    let unread_count = data.unread_count.unwrap_or_else(|| {
        data.notifications
            .iter()
            .filter(|item| item.read_at.is_none())
            .count() as u64
    });

    Ok(NotificationsPage {
        items: data.notifications,
        meta: data.meta,
        unread_count,
    })
}

pub async fn mark_notification_read(client: &ApiClient, id: &str) -> Result<Ack, ClientError> {
    let _: Value = client.patch(&format!("/v1/notifications/{id}")).await?;
    Ok(Ack {
        message: "Notification updated".to_string(),
    })
}
