//! Notification domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{DELIVERY_STATUS_FAILED, DELIVERY_STATUS_PENDING, DELIVERY_STATUS_SENT};

/// Outcome of the email attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => DELIVERY_STATUS_PENDING,
            DeliveryStatus::Sent => DELIVERY_STATUS_SENT,
            DeliveryStatus::Failed => DELIVERY_STATUS_FAILED,
        }
    }
}

impl From<&str> for DeliveryStatus {
    fn from(s: &str) -> Self {
        match s {
            DELIVERY_STATUS_SENT => DeliveryStatus::Sent,
            DELIVERY_STATUS_FAILED => DeliveryStatus::Failed,
            _ => DeliveryStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Booking confirmed")]
    pub subject: String,
    #[schema(example = "Your booking on 2024-06-01 at 10:00 is confirmed.")]
    pub message: String,
    pub delivery_status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
