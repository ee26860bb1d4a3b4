//! Booking domain entity.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{BOOKING_STATUS_CANCELLED, BOOKING_STATUS_CONFIRMED};

/// Booking lifecycle: confirmed on creation, cancelled at most once (idempotently).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => BOOKING_STATUS_CONFIRMED,
            BookingStatus::Cancelled => BOOKING_STATUS_CANCELLED,
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(s: &str) -> Self {
        match s {
            BOOKING_STATUS_CANCELLED => BookingStatus::Cancelled,
            _ => BookingStatus::Confirmed,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    #[schema(value_type = String, example = "2024-06-01")]
    pub booking_date: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

/// Data for a new booking row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
}
