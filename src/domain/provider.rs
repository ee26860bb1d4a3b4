//! Service provider domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A bookable service provider, optionally owned by a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceProvider {
    pub id: Uuid,
    /// Owning user account, if any
    pub user_id: Option<Uuid>,
    /// Contact email, unique across providers when present
    #[schema(example = "salon@example.com")]
    pub email: Option<String>,
    #[schema(example = "haircut")]
    pub service_type: String,
    #[schema(example = "Berlin")]
    pub location: String,
    #[schema(example = "+49 30 1234567")]
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceProvider {
    /// Whether `user_id` owns this provider.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Data for a new provider row.
#[derive(Debug, Clone)]
pub struct NewProvider {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub service_type: String,
    pub location: String,
    pub contact_number: String,
}

/// Partial provider update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProviderChanges {
    pub email: Option<String>,
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub contact_number: Option<String>,
}
