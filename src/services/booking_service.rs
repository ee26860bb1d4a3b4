//! Booking service - books slots, cancels bookings, lists them.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;

use super::NotificationService;
use crate::config::BOOKING_CONFIRMATION_SUBJECT;
use crate::domain::policy::authorize;
use crate::domain::{Action, Booking, BookingStatus, Identity, NewBooking, Resource, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// A booking as requested; `user_id` defaults to the caller.
#[derive(Debug, Clone, Copy)]
pub struct BookingRequest {
    pub user_id: Option<Uuid>,
    pub provider_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
}

#[async_trait]
pub trait BookingService: Send + Sync {
    /// Book a slot and send the confirmation
    async fn create_booking(&self, actor: &Identity, request: BookingRequest) -> AppResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> AppResult<Booking>;

    /// Mark a booking cancelled; cancelling twice is not an error
    async fn cancel_booking(&self, actor: &Identity, id: Uuid) -> AppResult<Booking>;

    async fn list_by_user(&self, actor: &Identity, user_id: Uuid) -> AppResult<Vec<Booking>>;

    async fn list_by_provider(&self, provider_id: Uuid) -> AppResult<Vec<Booking>>;
}

pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifications: Arc<dyn NotificationService>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>, notifications: Arc<dyn NotificationService>) -> Self {
        Self { uow, notifications }
    }

    /// Fire-and-forget confirmation; the booking stands whatever happens here.
    async fn confirm(&self, user: &User, booking: &Booking) {
        let message = format!(
            "Your booking on {} at {} is confirmed.",
            booking.booking_date,
            booking.booking_time.format("%H:%M")
        );

        if let Err(e) = self
            .notifications
            .deliver(user, BOOKING_CONFIRMATION_SUBJECT.to_string(), message)
            .await
        {
            tracing::warn!(booking_id = %booking.id, error = %e, "Booking confirmation not recorded");
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn create_booking(&self, actor: &Identity, request: BookingRequest) -> AppResult<Booking> {
        let user_id = request.user_id.unwrap_or(actor.id);
        authorize(
            actor,
            Action::Create,
            &Resource::Booking {
                user_id,
                provider_owner: None,
            },
        )?;

        let BookingRequest {
            provider_id,
            booking_date,
            booking_time,
            ..
        } = request;

        let (booking, user) = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let user = ctx.users().find_by_id(user_id).await?.ok_or_not_found()?;
                    ctx.providers().find_by_id(provider_id).await?.ok_or_not_found()?;

                    let slots = ctx
                        .availability()
                        .list_for_provider_on(provider_id, booking_date)
                        .await?;
                    if !slots.iter().any(|slot| slot.covers(booking_date, booking_time)) {
                        return Err(AppError::validation(format!(
                            "Provider is not available on {} at {}",
                            booking_date, booking_time
                        )));
                    }

                    if ctx
                        .bookings()
                        .find_confirmed_at(provider_id, booking_date, booking_time)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict("A booking for this time"));
                    }

                    let booking = ctx
                        .bookings()
                        .create(NewBooking {
                            user_id,
                            provider_id,
                            booking_date,
                            booking_time,
                        })
                        .await?;

                    Ok((booking, user))
                })
            })
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            provider_id = %booking.provider_id,
            "Booking confirmed"
        );

        self.confirm(&user, &booking).await;
        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> AppResult<Booking> {
        self.uow.bookings().find_by_id(id).await?.ok_or_not_found()
    }

    async fn cancel_booking(&self, actor: &Identity, id: Uuid) -> AppResult<Booking> {
        let actor = *actor;
        let booking = crate::with_transaction!(self.uow, |ctx| {
            let booking = ctx.bookings().find_by_id(id).await?.ok_or_not_found()?;
            let provider = ctx.providers().find_by_id(booking.provider_id).await?;

            authorize(
                &actor,
                Action::Update,
                &Resource::Booking {
                    user_id: booking.user_id,
                    provider_owner: provider.and_then(|p| p.user_id),
                },
            )?;

            if booking.is_cancelled() {
                return Ok(booking);
            }
            ctx.bookings().update_status(id, BookingStatus::Cancelled).await
        })?;

        tracing::info!(booking_id = %booking.id, actor_id = %actor.id, "Booking cancelled");
        Ok(booking)
    }

    async fn list_by_user(&self, actor: &Identity, user_id: Uuid) -> AppResult<Vec<Booking>> {
        authorize(actor, Action::Read, &Resource::User(user_id))?;
        self.uow.bookings().list_by_user(user_id).await
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> AppResult<Vec<Booking>> {
        self.uow.bookings().list_by_provider(provider_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MockBookingRepository;
    use crate::services::test_support::TestUnitOfWork;
    use crate::services::MockNotificationService;
    use mockall::predicate::eq;

    fn service(bookings: MockBookingRepository) -> BookingManager<TestUnitOfWork> {
        let uow = TestUnitOfWork::builder().bookings(bookings).build();
        BookingManager::new(Arc::new(uow), Arc::new(MockNotificationService::new()))
    }

    #[tokio::test]
    async fn test_booking_for_someone_else_forbidden() {
        let service = service(MockBookingRepository::new());
        let actor = Identity::new(Uuid::new_v4(), UserRole::User);
        let request = BookingRequest {
            user_id: Some(Uuid::new_v4()),
            provider_id: Uuid::new_v4(),
            booking_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            booking_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };

        let result = service.create_booking(&actor, request).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_get_missing_booking() {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_find_by_id().returning(|_| Ok(None));

        let result = service(bookings).get_booking(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_by_user_empty_is_valid() {
        let user_id = Uuid::new_v4();
        let mut bookings = MockBookingRepository::new();
        bookings.expect_list_by_user()
            .with(eq(user_id))
            .returning(|_| Ok(vec![]));

        let actor = Identity::new(user_id, UserRole::User);
        let result = service(bookings).list_by_user(&actor, user_id).await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_other_users_bookings_forbidden() {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_list_by_user().never();

        let actor = Identity::new(Uuid::new_v4(), UserRole::User);
        let result = service(bookings).list_by_user(&actor, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
