//! Authentication service - registration, login and token verification.
//!
//! Password hashing is handled by the domain `Password` value object,
//! token signing by `TokenIssuer`.

use async_trait::async_trait;
use std::sync::Arc;

use super::TokenIssuer;
use crate::config::MIN_USERNAME_LENGTH;
use crate::domain::{Identity, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// An authenticated user together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user with the `user` role
    async fn register(&self, username: String, email: String, password: String)
        -> AppResult<AuthSession>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Verify a bearer token and extract the identity it carries
    fn verify_token(&self, token: &str) -> AppResult<Identity>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenIssuer>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<TokenIssuer>) -> Self {
        Self { uow, tokens }
    }
}

/// Shape checks shared by user and provider self-registration.
pub(crate) fn check_registration(username: &str, password: &str) -> AppResult<()> {
    if username.trim().chars().count() < MIN_USERNAME_LENGTH as usize {
        return Err(AppError::validation("Username must not be empty"));
    }
    Password::check_length(password)
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<AuthSession> {
        // Email format is validated by the handler's ValidatedJson extractor
        check_registration(&username, &password)?;

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::hash_blocking(password).await?.into_string();
        // The unique index still catches a concurrent registration of the same email
        let user = self
            .uow
            .users()
            .create(username, email, password_hash, UserRole::User)
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Unknown emails are checked against a decoy hash so both failure
        // paths cost the same.
        let stored = user
            .as_ref()
            .map(|u| Password::from_hash(u.password_hash.clone()));
        let password_valid = Password::verify_blocking(stored, password).await;

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        tracing::info!(user_id = %user.id, "User logged in");

        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    fn verify_token(&self, token: &str) -> AppResult<Identity> {
        Ok(self.tokens.verify(token)?.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::{test_user, TestUnitOfWork};
    use mockall::predicate::eq;

    fn tokens() -> Arc<TokenIssuer> {
        let config =
            crate::config::Config::new("sqlite::memory:", "auth-test-secret-that-is-long-enough")
                .unwrap();
        Arc::new(TokenIssuer::new(&config))
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("taken@example.com"))
            .returning(|_| Ok(Some(test_user(uuid::Uuid::new_v4()))));
        repo.expect_create().never();

        let uow = TestUnitOfWork::builder().users(repo).build();
        let service = Authenticator::new(Arc::new(uow), tokens());

        let result = service
            .register("jdoe".into(), "taken@example.com".into(), "secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_short_password_rejected() {
        let uow = TestUnitOfWork::builder().build();
        let service = Authenticator::new(Arc::new(uow), tokens());

        let result = service
            .register("jdoe".into(), "new@example.com".into(), "12345".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|username, email, password_hash, role| {
                let mut user = test_user(uuid::Uuid::new_v4());
                user.username = username;
                user.email = email;
                user.password_hash = password_hash;
                user.role = role;
                Ok(user)
            });

        let tokens = tokens();
        let uow = TestUnitOfWork::builder().users(repo).build();
        let service = Authenticator::new(Arc::new(uow), tokens.clone());

        let session = service
            .register("jdoe".into(), "new@example.com".into(), "secret1".into())
            .await
            .unwrap();

        assert_eq!(session.user.role, UserRole::User);
        assert_ne!(session.user.password_hash, "secret1");
        assert_eq!(tokens.verify(&session.token).unwrap().sub, session.user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut stored = test_user(uuid::Uuid::new_v4());
        stored.password_hash = Password::new("right-password").unwrap().into_string();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("known@example.com"))
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_find_by_email()
            .with(eq("unknown@example.com"))
            .returning(|_| Ok(None));

        let uow = TestUnitOfWork::builder().users(repo).build();
        let service = Authenticator::new(Arc::new(uow), tokens());

        let wrong_password = service
            .login("known@example.com".into(), "wrong-password".into())
            .await
            .unwrap_err();
        let unknown_email = service
            .login("unknown@example.com".into(), "right-password".into())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut stored = test_user(uuid::Uuid::new_v4());
        stored.password_hash = Password::new("right-password").unwrap().into_string();
        let id = stored.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let uow = TestUnitOfWork::builder().users(repo).build();
        let service = Authenticator::new(Arc::new(uow), tokens());

        let session = service
            .login("known@example.com".into(), "right-password".into())
            .await
            .unwrap();

        assert_eq!(session.user.id, id);
        assert_eq!(service.verify_token(&session.token).unwrap().id, id);
    }
}
