//! Provider service - providers and their availability slots.
//!
//! Writes that touch a provider together with its slots run in one
//! transaction, so a rejected slot leaves no half-created provider behind.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;

use super::auth_service::check_registration;
use super::TokenIssuer;
use crate::domain::availability::{ensure_disjoint, ensure_free};
use crate::domain::policy::authorize;
use crate::domain::{
    Action, Availability, Identity, NewProvider, Password, ProviderChanges, Resource,
    ServiceProvider, SlotWindow, User, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};

/// Self-registration of a provider together with its owning account.
#[derive(Debug, Clone)]
pub struct ProviderRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub service_type: String,
    pub location: String,
    pub contact_number: String,
    pub slots: Vec<SlotWindow>,
}

/// Result of a provider self-registration.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub provider: ServiceProvider,
    pub user: User,
    pub token: String,
}

/// Partial change to a single slot; missing parts keep their stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotPatch {
    pub available_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl SlotPatch {
    fn apply(&self, current: &Availability) -> AppResult<SlotWindow> {
        SlotWindow::new(
            self.available_date.unwrap_or(current.available_date),
            self.start_time.unwrap_or(current.start_time),
            self.end_time.unwrap_or(current.end_time),
        )
    }
}

#[async_trait]
pub trait ProviderService: Send + Sync {
    /// Create a provider and its initial slots (admin only)
    async fn create_provider(
        &self,
        actor: &Identity,
        provider: NewProvider,
        slots: Vec<SlotWindow>,
    ) -> AppResult<ServiceProvider>;

    /// Create an owning user, the provider and its slots
    async fn register_provider(&self, registration: ProviderRegistration)
        -> AppResult<ProviderSession>;

    async fn get_provider(&self, id: Uuid) -> AppResult<ServiceProvider>;

    /// Partial update; `Some(slots)` replaces the whole slot set
    async fn update_provider(
        &self,
        actor: &Identity,
        id: Uuid,
        changes: ProviderChanges,
        slots: Option<Vec<SlotWindow>>,
    ) -> AppResult<ServiceProvider>;

    /// Slots of a provider in insertion order
    async fn get_availability(&self, provider_id: Uuid) -> AppResult<Vec<Availability>>;

    async fn create_slot(
        &self,
        actor: &Identity,
        provider_id: Uuid,
        window: SlotWindow,
    ) -> AppResult<Availability>;

    async fn update_slot(&self, actor: &Identity, slot_id: Uuid, patch: SlotPatch)
        -> AppResult<Availability>;

    async fn delete_slot(&self, actor: &Identity, slot_id: Uuid) -> AppResult<()>;
}

pub struct ProviderManager<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenIssuer>,
}

impl<U: UnitOfWork> ProviderManager<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<TokenIssuer>) -> Self {
        Self { uow, tokens }
    }
}

/// Reject `email` if another provider already uses it.
async fn ensure_provider_email_free(
    ctx: &TransactionContext<'_>,
    email: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    match ctx.providers().find_by_email(email).await? {
        Some(existing) if Some(existing.id) != except => Err(AppError::conflict("Email")),
        _ => Ok(()),
    }
}

/// Load the provider owning `provider_id` and check `actor` may modify it.
async fn load_for_update(
    ctx: &TransactionContext<'_>,
    actor: &Identity,
    provider_id: Uuid,
) -> AppResult<ServiceProvider> {
    let provider = ctx.providers().find_by_id(provider_id).await?.ok_or_not_found()?;
    authorize(
        actor,
        Action::Update,
        &Resource::Provider {
            owner: provider.user_id,
        },
    )?;
    Ok(provider)
}

#[async_trait]
impl<U: UnitOfWork> ProviderService for ProviderManager<U> {
    async fn create_provider(
        &self,
        actor: &Identity,
        provider: NewProvider,
        slots: Vec<SlotWindow>,
    ) -> AppResult<ServiceProvider> {
        authorize(actor, Action::Create, &Resource::ProviderDirectory)?;
        ensure_disjoint(&slots)?;

        let provider = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if let Some(owner) = provider.user_id {
                        if ctx.users().find_by_id(owner).await?.is_none() {
                            return Err(AppError::validation("user_id does not match any user"));
                        }
                    }
                    if let Some(email) = &provider.email {
                        ensure_provider_email_free(&ctx, email, None).await?;
                    }

                    let provider = ctx.providers().create(provider).await?;
                    ctx.availability().create_many(provider.id, &slots).await?;
                    Ok(provider)
                })
            })
            .await?;

        tracing::info!(provider_id = %provider.id, actor_id = %actor.id, "Provider created");
        Ok(provider)
    }

    async fn register_provider(
        &self,
        registration: ProviderRegistration,
    ) -> AppResult<ProviderSession> {
        check_registration(&registration.username, &registration.password)?;
        ensure_disjoint(&registration.slots)?;

        // Hash outside the transaction
        let password_hash = Password::hash_blocking(registration.password.clone())
            .await?
            .into_string();

        let (user, provider) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.users().find_by_email(&registration.email).await?.is_some() {
                        return Err(AppError::conflict("Email"));
                    }
                    ensure_provider_email_free(&ctx, &registration.email, None).await?;

                    let user = ctx
                        .users()
                        .create(
                            registration.username,
                            registration.email.clone(),
                            password_hash,
                            UserRole::User,
                        )
                        .await?;

                    let provider = ctx
                        .providers()
                        .create(NewProvider {
                            user_id: Some(user.id),
                            email: Some(registration.email),
                            service_type: registration.service_type,
                            location: registration.location,
                            contact_number: registration.contact_number,
                        })
                        .await?;

                    ctx.availability()
                        .create_many(provider.id, &registration.slots)
                        .await?;

                    Ok((user, provider))
                })
            })
            .await?;

        tracing::info!(provider_id = %provider.id, user_id = %user.id, "Provider registered");

        let token = self.tokens.issue(&user)?;
        Ok(ProviderSession {
            provider,
            user,
            token,
        })
    }

    async fn get_provider(&self, id: Uuid) -> AppResult<ServiceProvider> {
        self.uow.providers().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_provider(
        &self,
        actor: &Identity,
        id: Uuid,
        changes: ProviderChanges,
        slots: Option<Vec<SlotWindow>>,
    ) -> AppResult<ServiceProvider> {
        if let Some(slots) = &slots {
            ensure_disjoint(slots)?;
        }

        let actor = *actor;
        let provider = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    load_for_update(&ctx, &actor, id).await?;

                    if let Some(email) = &changes.email {
                        ensure_provider_email_free(&ctx, email, Some(id)).await?;
                    }

                    let provider = ctx.providers().update(id, changes).await?;

                    if let Some(slots) = slots {
                        let removed = ctx.availability().delete_for_provider(id).await?;
                        ctx.availability().create_many(id, &slots).await?;
                        tracing::debug!(
                            provider_id = %id,
                            removed,
                            added = slots.len(),
                            "Availability replaced"
                        );
                    }

                    Ok(provider)
                })
            })
            .await?;

        tracing::info!(provider_id = %provider.id, actor_id = %actor.id, "Provider updated");
        Ok(provider)
    }

    async fn get_availability(&self, provider_id: Uuid) -> AppResult<Vec<Availability>> {
        self.uow
            .providers()
            .find_by_id(provider_id)
            .await?
            .ok_or_not_found()?;
        self.uow.availability().list_for_provider(provider_id).await
    }

    async fn create_slot(
        &self,
        actor: &Identity,
        provider_id: Uuid,
        window: SlotWindow,
    ) -> AppResult<Availability> {
        let actor = *actor;
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    load_for_update(&ctx, &actor, provider_id).await?;

                    let same_day = ctx
                        .availability()
                        .list_for_provider_on(provider_id, window.available_date)
                        .await?;
                    ensure_free(&window, &same_day)?;

                    ctx.availability().create(provider_id, window).await
                })
            })
            .await
    }

    async fn update_slot(
        &self,
        actor: &Identity,
        slot_id: Uuid,
        patch: SlotPatch,
    ) -> AppResult<Availability> {
        let actor = *actor;
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let slot = ctx.availability().find_by_id(slot_id).await?.ok_or_not_found()?;
                    load_for_update(&ctx, &actor, slot.provider_id).await?;

                    let window = patch.apply(&slot)?;
                    let same_day = ctx
                        .availability()
                        .list_for_provider_on(slot.provider_id, window.available_date)
                        .await?;
                    ensure_free(&window, same_day.iter().filter(|other| other.id != slot_id))?;

                    ctx.availability().update(slot_id, window).await
                })
            })
            .await
    }

    async fn delete_slot(&self, actor: &Identity, slot_id: Uuid) -> AppResult<()> {
        let actor = *actor;
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let slot = ctx.availability().find_by_id(slot_id).await?.ok_or_not_found()?;
                    load_for_update(&ctx, &actor, slot.provider_id).await?;
                    ctx.availability().delete(slot_id).await
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockAvailabilityRepository, MockProviderRepository};
    use crate::services::test_support::{test_provider, TestUnitOfWork};

    fn tokens() -> Arc<TokenIssuer> {
        let config =
            crate::config::Config::new("sqlite::memory:", "provider-test-secret-long-enough!!")
                .unwrap();
        Arc::new(TokenIssuer::new(&config))
    }

    fn window(day: u32, start: u32, end: u32) -> SlotWindow {
        SlotWindow::new(
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn new_provider() -> NewProvider {
        NewProvider {
            user_id: None,
            email: None,
            service_type: "haircut".into(),
            location: "Berlin".into(),
            contact_number: "123".into(),
        }
    }

    #[tokio::test]
    async fn test_create_provider_requires_admin() {
        let service = ProviderManager::new(Arc::new(TestUnitOfWork::builder().build()), tokens());
        let actor = Identity::new(Uuid::new_v4(), UserRole::User);

        let result = service.create_provider(&actor, new_provider(), vec![]).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_create_provider_rejects_overlapping_slots() {
        let service = ProviderManager::new(Arc::new(TestUnitOfWork::builder().build()), tokens());
        let admin = Identity::new(Uuid::new_v4(), UserRole::Admin);

        let result = service
            .create_provider(&admin, new_provider(), vec![window(1, 9, 12), window(1, 11, 13)])
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_availability_of_missing_provider() {
        let mut providers = MockProviderRepository::new();
        providers.expect_find_by_id().returning(|_| Ok(None));
        let mut availability = MockAvailabilityRepository::new();
        availability.expect_list_for_provider().never();

        let uow = TestUnitOfWork::builder()
            .providers(providers)
            .availability(availability)
            .build();
        let service = ProviderManager::new(Arc::new(uow), tokens());

        let result = service.get_availability(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_availability_empty_is_valid() {
        let mut providers = MockProviderRepository::new();
        providers.expect_find_by_id()
            .returning(|id| Ok(Some(test_provider(id, None))));
        let mut availability = MockAvailabilityRepository::new();
        availability.expect_list_for_provider().returning(|_| Ok(vec![]));

        let uow = TestUnitOfWork::builder()
            .providers(providers)
            .availability(availability)
            .build();
        let service = ProviderManager::new(Arc::new(uow), tokens());

        assert!(service.get_availability(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[test]
    fn test_slot_patch_keeps_unset_parts() {
        let slot = Availability {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            available_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            created_at: chrono::Utc::now(),
        };

        let patch = SlotPatch {
            end_time: Some(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(patch.apply(&slot).unwrap(), window(1, 9, 10));

        let inverted = SlotPatch {
            start_time: Some(NaiveTime::from_hms_opt(13, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(inverted.apply(&slot).is_err());
    }
}
