//! Access policy.
//!
//! Every mutation endpoint, and every read of private data, goes through
//! [`authorize`]. Admins pass all checks; everybody else passes only on
//! resources they own.

use uuid::Uuid;

use super::UserRole;
use crate::errors::{AppError, AppResult};

/// The authenticated principal derived from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: UserRole,
}

impl Identity {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// What is being acted on, reduced to the ownership facts the policy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A user account, or data scoped to it (its bookings, its notifications).
    User(Uuid),
    /// A provider and its availability slots.
    Provider { owner: Option<Uuid> },
    /// A booking: the booking user, plus the owner of the booked provider.
    Booking {
        user_id: Uuid,
        provider_owner: Option<Uuid>,
    },
    /// The set of all providers; creating entries in it is an admin task.
    ProviderDirectory,
}

/// Decide whether `identity` may perform `action` on `resource`.
pub fn allow(identity: &Identity, action: Action, resource: &Resource) -> bool {
    if identity.is_admin() {
        return true;
    }

    match *resource {
        Resource::User(id) => id == identity.id,
        Resource::Provider { owner } => owner == Some(identity.id),
        Resource::Booking {
            user_id,
            provider_owner,
        } => match action {
            // Bookings are made in one's own name
            Action::Create => user_id == identity.id,
            _ => user_id == identity.id || provider_owner == Some(identity.id),
        },
        Resource::ProviderDirectory => false,
    }
}

/// [`allow`], mapped to `Forbidden` on denial.
pub fn authorize(identity: &Identity, action: Action, resource: &Resource) -> AppResult<()> {
    if allow(identity, action, resource) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %identity.id,
            action = ?action,
            resource = ?resource,
            "Access denied"
        );
        Err(AppError::Forbidden)
    }
}
