//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::policy::authorize;
use crate::domain::{Action, Identity, Password, Resource, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Requested changes to an account; plain-text password.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get a user the actor may see
    async fn get_user(&self, actor: &Identity, id: Uuid) -> AppResult<User>;

    /// Update a user; only admins may change roles
    async fn update_user(&self, actor: &Identity, id: Uuid, update: UserUpdate) -> AppResult<User>;

    /// Grant the admin role (operator bootstrap, no actor)
    async fn promote(&self, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, actor: &Identity, id: Uuid) -> AppResult<User> {
        authorize(actor, Action::Read, &Resource::User(id))?;
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_user(&self, actor: &Identity, id: Uuid, update: UserUpdate) -> AppResult<User> {
        authorize(actor, Action::Update, &Resource::User(id))?;
        if update.role.is_some() && !actor.is_admin() {
            return Err(AppError::Forbidden);
        }

        let users = self.uow.users();
        users.find_by_id(id).await?.ok_or_not_found()?;

        if let Some(email) = &update.email {
            if let Some(other) = users.find_by_email(email).await? {
                if other.id != id {
                    return Err(AppError::conflict("Email"));
                }
            }
        }

        let password_hash = match update.password {
            Some(password) => Some(Password::hash_blocking(password).await?.into_string()),
            None => None,
        };

        let changes = UserChanges {
            username: update.username,
            email: update.email,
            password_hash,
            role: update.role,
        };

        let user = users.update(id, changes).await?;
        tracing::info!(user_id = %user.id, actor_id = %actor.id, "User updated");
        Ok(user)
    }

    async fn promote(&self, email: &str) -> AppResult<User> {
        let users = self.uow.users();
        let user = users.find_by_email(email).await?.ok_or_not_found()?;

        let changes = UserChanges {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        let user = users.update(user.id, changes).await?;

        tracing::info!(user_id = %user.id, "User promoted to admin");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::{test_user, TestUnitOfWork};
    use mockall::predicate::{always, eq};

    #[tokio::test]
    async fn test_get_user_success() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(user_id))
            .returning(|id| Ok(Some(test_user(id))));

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let actor = Identity::new(user_id, UserRole::User);
        let result = service.get_user(&actor, user_id).await;

        assert_eq!(result.unwrap().id, user_id);
    }

    #[tokio::test]
    async fn test_get_other_user_forbidden() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let actor = Identity::new(Uuid::new_v4(), UserRole::User);
        let result = service.get_user(&actor, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_admin_reads_any_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let admin = Identity::new(Uuid::new_v4(), UserRole::Admin);
        let result = service.get_user(&admin, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_self_role_change_forbidden() {
        let user_id = Uuid::new_v4();
        let repo = MockUserRepository::new();

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let actor = Identity::new(user_id, UserRole::User);
        let update = UserUpdate {
            role: Some(UserRole::Admin),
            ..Default::default()
        };

        let result = service.update_user(&actor, user_id, update).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(test_user(Uuid::new_v4()))));
        repo.expect_update().never();

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let actor = Identity::new(user_id, UserRole::User);
        let update = UserUpdate {
            email: Some("taken@example.com".into()),
            ..Default::default()
        };

        let result = service.update_user(&actor, user_id, update).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_password_is_rehashed() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_update()
            .with(eq(user_id), always())
            .returning(|id, changes| {
                let hash = changes.password_hash.expect("password hash set");
                assert!(Password::from_hash(hash.clone()).verify("new-secret"));
                let mut user = test_user(id);
                user.password_hash = hash;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let actor = Identity::new(user_id, UserRole::User);
        let update = UserUpdate {
            password: Some("new-secret".into()),
            ..Default::default()
        };

        assert!(service.update_user(&actor, user_id, update).await.is_ok());
    }

    #[tokio::test]
    async fn test_promote_sets_admin_role() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(test_user(user_id))));
        repo.expect_update()
            .returning(|id, changes| {
                let mut user = test_user(id);
                user.role = changes.role.unwrap_or(UserRole::User);
                Ok(user)
            });

        let service = UserManager::new(Arc::new(TestUnitOfWork::builder().users(repo).build()));
        let user = service.promote("someone@example.com").await.unwrap();

        assert_eq!(user.role, UserRole::Admin);
    }
}
