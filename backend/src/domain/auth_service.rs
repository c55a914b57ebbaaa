use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::auth::jwt::JwtConfig;
use crate::auth::password;
use crate::domain::commands::auth::{LoginCommand, LoginResult, SignupCommand, SignupResult};
use crate::domain::errors::DomainError;
use crate::domain::models::user::{NewUser, Role};
use crate::storage::traits::UserStore;

/// Service for account creation and login
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Create a new account with a hashed password
    pub async fn signup(&self, command: SignupCommand) -> Result<SignupResult, DomainError> {
        let (name, email, password) = match (&command.name, &command.email, &command.password) {
            (Some(name), Some(email), Some(password))
                if !name.trim().is_empty() && !email.trim().is_empty() && !password.is_empty() =>
            {
                (name.trim(), email, password)
            }
            _ => {
                return Err(DomainError::Validation(
                    "All fields are required".to_string(),
                ))
            }
        };

        let role = match command.role.as_deref() {
            None => Role::User,
            Some(role) => Role::parse(role)
                .ok_or_else(|| DomainError::Validation("Invalid role".to_string()))?,
        };

        let email = email.trim().to_lowercase();
        info!("Creating account for {}", email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Validation(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = password::hash_password(password)?;

        let now = Utc::now();
        let user = self
            .users
            .insert_user(NewUser {
                name: name.to_string(),
                email,
                phone: command.phone.clone(),
                password_hash,
                role,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!("Created account {} with role {}", user.id, user.role);

        Ok(SignupResult { user })
    }

    /// Verify credentials and issue a bearer token
    pub async fn login(&self, command: LoginCommand) -> Result<LoginResult, DomainError> {
        let (email, password) = match (&command.email, &command.password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => {
                return Err(DomainError::Validation(
                    "All fields are required".to_string(),
                ))
            }
        };

        let email = email.trim().to_lowercase();

        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            DomainError::NotFound("No user found with this email, please signup".to_string())
        })?;

        if !password::verify_password(password, &user.password_hash) {
            warn!("Failed login attempt for user {}", user.id);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .jwt
            .issue(&user)
            .map_err(|e| DomainError::Storage(anyhow::anyhow!("failed to issue token: {e}")))?;

        info!("User {} logged in", user.id);

        Ok(LoginResult { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::storage::sqlite::SqliteUserRepository;

    async fn setup_test() -> AuthService {
        let db = DbConnection::init_in_memory()
            .await
            .expect("Failed to create test database");
        let users = Arc::new(SqliteUserRepository::new(db));
        AuthService::new(users, JwtConfig::from_secret(b"test-secret"))
    }

    fn signup_command(email: &str, role: Option<&str>) -> SignupCommand {
        SignupCommand {
            name: Some("Priya".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter2hunter2".to_string()),
            role: role.map(|r| r.to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_signup_normalizes_email_and_hashes_password() {
        let service = setup_test().await;

        let result = service
            .signup(signup_command("  Priya@Example.COM ", None))
            .await
            .unwrap();

        assert_eq!(result.user.email, "priya@example.com");
        assert_eq!(result.user.role, Role::User);
        assert_ne!(result.user.password_hash, "hunter2hunter2");
    }

    #[tokio::test]
    async fn test_signup_missing_fields() {
        let service = setup_test().await;

        let mut command = signup_command("a@b.com", None);
        command.password = None;

        let err = service.signup(command).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_signup_rejects_unknown_role() {
        let service = setup_test().await;

        let err = service
            .signup(signup_command("a@b.com", Some("superuser")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let service = setup_test().await;

        service.signup(signup_command("a@b.com", None)).await.unwrap();
        let err = service
            .signup(signup_command("A@B.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_roundtrip_issues_decodable_token() {
        let service = setup_test().await;
        service.signup(signup_command("a@b.com", Some("admin"))).await.unwrap();

        let result = service
            .login(LoginCommand {
                email: Some("a@b.com".to_string()),
                password: Some("hunter2hunter2".to_string()),
            })
            .await
            .unwrap();

        let claims = JwtConfig::from_secret(b"test-secret")
            .verify(&result.token)
            .unwrap();
        assert_eq!(claims.sub, result.user.id.to_string());
        assert_eq!(claims.role, "admin");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = setup_test().await;
        service.signup(signup_command("a@b.com", None)).await.unwrap();

        let err = service
            .login(LoginCommand {
                email: Some("a@b.com".to_string()),
                password: Some("wrong".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = setup_test().await;

        let err = service
            .login(LoginCommand {
                email: Some("ghost@b.com".to_string()),
                password: Some("whatever".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
