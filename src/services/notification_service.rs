//! Notification service - records notifications and dispatches their emails.
//!
//! A notification is stored as `pending` before any email goes out, then
//! marked `sent` or `failed`. Dispatch failures never surface as errors.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::DEFAULT_NOTIFICATION_SUBJECT;
use crate::domain::policy::authorize;
use crate::domain::{Action, DeliveryStatus, Identity, Notification, Resource, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{EmailDispatcher, EmailMessage, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Send a notification to `user_id` on behalf of `actor`
    async fn send(
        &self,
        actor: &Identity,
        user_id: Uuid,
        subject: Option<String>,
        message: String,
    ) -> AppResult<Notification>;

    /// Notifications addressed to `user_id`
    async fn list_for_user(&self, actor: &Identity, user_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Record and dispatch a notification to an already-loaded user
    async fn deliver(&self, recipient: &User, subject: String, message: String)
        -> AppResult<Notification>;
}

pub struct Notifier<U: UnitOfWork> {
    uow: Arc<U>,
    dispatcher: Arc<dyn EmailDispatcher>,
    timeout: Duration,
}

impl<U: UnitOfWork> Notifier<U> {
    pub fn new(uow: Arc<U>, dispatcher: Arc<dyn EmailDispatcher>, timeout: Duration) -> Self {
        Self {
            uow,
            dispatcher,
            timeout,
        }
    }

    async fn dispatch(&self, message: EmailMessage) -> AppResult<()> {
        match tokio::time::timeout(self.timeout, self.dispatcher.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::dispatch(format!("timed out after {:?}", self.timeout))),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for Notifier<U> {
    async fn send(
        &self,
        actor: &Identity,
        user_id: Uuid,
        subject: Option<String>,
        message: String,
    ) -> AppResult<Notification> {
        authorize(actor, Action::Create, &Resource::User(user_id))?;

        if message.trim().is_empty() {
            return Err(AppError::validation("Message must not be empty"));
        }

        let recipient = self.uow.users().find_by_id(user_id).await?.ok_or_not_found()?;
        let subject = subject
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NOTIFICATION_SUBJECT.to_string());

        self.deliver(&recipient, subject, message).await
    }

    async fn list_for_user(&self, actor: &Identity, user_id: Uuid) -> AppResult<Vec<Notification>> {
        authorize(actor, Action::Read, &Resource::User(user_id))?;
        self.uow.notifications().list_for_user(user_id).await
    }

    async fn deliver(
        &self,
        recipient: &User,
        subject: String,
        message: String,
    ) -> AppResult<Notification> {
        let notifications = self.uow.notifications();
        let pending = notifications
            .create(recipient.id, subject.clone(), message.clone())
            .await?;

        let email = EmailMessage::new(recipient.email.clone(), subject, message);
        let status = match self.dispatch(email).await {
            Ok(()) => DeliveryStatus::Sent,
            Err(e) => {
                tracing::warn!(
                    notification_id = %pending.id,
                    user_id = %recipient.id,
                    error = %e,
                    "Notification email not delivered"
                );
                DeliveryStatus::Failed
            }
        };

        notifications.set_delivery_status(pending.id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockEmailDispatcher, MockNotificationRepository, MockUserRepository};
    use crate::services::test_support::{test_notification, test_user, TestUnitOfWork};
    use mockall::predicate::eq;

    fn notifications_expecting(final_status: DeliveryStatus) -> MockNotificationRepository {
        let mut repo = MockNotificationRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|user_id, subject, message| {
                Ok(test_notification(user_id, subject, message, DeliveryStatus::Pending))
            });
        repo.expect_set_delivery_status()
            .with(mockall::predicate::always(), eq(final_status))
            .times(1)
            .returning(move |id, status| {
                let mut n = test_notification(Uuid::new_v4(), "s".into(), "m".into(), status);
                n.id = id;
                Ok(n)
            });
        repo
    }

    /// Dispatcher that never finishes within any reasonable timeout
    struct StalledMailer;

    #[async_trait]
    impl EmailDispatcher for StalledMailer {
        async fn send(&self, _message: EmailMessage) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stalled_dispatch_is_recorded_as_failed() {
        let user_id = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));

        let uow = TestUnitOfWork::builder()
            .users(users)
            .notifications(notifications_expecting(DeliveryStatus::Failed))
            .build();
        let service = Notifier::new(
            Arc::new(uow),
            Arc::new(StalledMailer),
            Duration::from_millis(10),
        );

        let actor = Identity::new(user_id, UserRole::User);
        let started = std::time::Instant::now();
        let result = service.send(&actor, user_id, None, "Body".into()).await.unwrap();

        assert_eq!(result.delivery_status, DeliveryStatus::Failed);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_dispatch_timeout_message_keeps_sub_second_precision() {
        let uow = TestUnitOfWork::builder().build();
        let service = Notifier::new(
            Arc::new(uow),
            Arc::new(StalledMailer),
            Duration::from_millis(10),
        );

        let message = EmailMessage::new("a@example.com", "s", "m");
        match service.dispatch(message).await {
            Err(AppError::Dispatch(msg)) => assert_eq!(msg, "timed out after 10ms"),
            other => panic!("expected dispatch timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_marks_sent_on_success() {
        let user_id = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));

        let mut dispatcher = MockEmailDispatcher::new();
        dispatcher.expect_send()
            .withf(|m| m.subject == "Hello" && m.body == "World")
            .times(1)
            .returning(|_| Ok(()));

        let uow = TestUnitOfWork::builder()
            .users(users)
            .notifications(notifications_expecting(DeliveryStatus::Sent))
            .build();
        let service = Notifier::new(Arc::new(uow), Arc::new(dispatcher), Duration::from_secs(1));

        let actor = Identity::new(user_id, UserRole::User);
        let result = service
            .send(&actor, user_id, Some("Hello".into()), "World".into())
            .await
            .unwrap();

        assert_eq!(result.delivery_status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_recorded_not_raised() {
        let user_id = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));

        let mut dispatcher = MockEmailDispatcher::new();
        dispatcher.expect_send()
            .returning(|_| Err(AppError::dispatch("relay refused")));

        let uow = TestUnitOfWork::builder()
            .users(users)
            .notifications(notifications_expecting(DeliveryStatus::Failed))
            .build();
        let service = Notifier::new(Arc::new(uow), Arc::new(dispatcher), Duration::from_secs(1));

        let actor = Identity::new(user_id, UserRole::User);
        let result = service.send(&actor, user_id, None, "Body".into()).await.unwrap();

        assert_eq!(result.delivery_status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_send_to_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let uow = TestUnitOfWork::builder().users(users).build();
        let service = Notifier::new(
            Arc::new(uow),
            Arc::new(MockEmailDispatcher::new()),
            Duration::from_secs(1),
        );

        let admin = Identity::new(Uuid::new_v4(), UserRole::Admin);
        let result = service.send(&admin, Uuid::new_v4(), None, "Body".into()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_send_to_other_user_forbidden() {
        let uow = TestUnitOfWork::builder().build();
        let service = Notifier::new(
            Arc::new(uow),
            Arc::new(MockEmailDispatcher::new()),
            Duration::from_secs(1),
        );

        let actor = Identity::new(Uuid::new_v4(), UserRole::User);
        let result = service.send(&actor, Uuid::new_v4(), None, "Body".into()).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_list_for_user_returns_empty_list() {
        let user_id = Uuid::new_v4();

        let mut notifications = MockNotificationRepository::new();
        notifications.expect_list_for_user()
            .with(eq(user_id))
            .returning(|_| Ok(vec![]));

        let uow = TestUnitOfWork::builder().notifications(notifications).build();
        let service = Notifier::new(
            Arc::new(uow),
            Arc::new(MockEmailDispatcher::new()),
            Duration::from_secs(1),
        );

        let actor = Identity::new(user_id, UserRole::User);
        assert!(service.list_for_user(&actor, user_id).await.unwrap().is_empty());
    }
}
