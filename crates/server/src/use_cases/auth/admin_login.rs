//! Admin login: username + password + the environment-configured security
//! key, all three required.

use std::sync::Arc;

use pharmstock_domain::{Role, User};

use super::error::AuthError;
use crate::infrastructure::ports::{PasswordHasherPort, UserRepo};

pub struct AdminLogin {
    user_repo: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasherPort>,
    security_key: String,
}

impl AdminLogin {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        hasher: Arc<dyn PasswordHasherPort>,
        security_key: String,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            security_key,
        }
    }

    pub async fn execute(
        &self,
        username: &str,
        password: &str,
        security_key: &str,
    ) -> Result<User, AuthError> {
        if self.security_key.is_empty() || security_key != self.security_key {
            return Err(AuthError::InvalidSecurityKey);
        }

        let user = self
            .user_repo
            .get_by_username(&username.trim().to_ascii_lowercase())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if user.role != Role::Admin || !user.enabled {
            return Err(AuthError::InvalidCredentials);
        }
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !self.hasher.verify(password, hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockPasswordHasherPort, MockUserRepo};
    use mockall::predicate::*;
    use pharmstock_domain::PharmacyId;

    fn admin() -> User {
        User::admin("admin@pharmstock.lk", "$argon2id$hash")
    }

    fn use_case(user_repo: MockUserRepo, hasher: MockPasswordHasherPort) -> AdminLogin {
        AdminLogin::new(Arc::new(user_repo), Arc::new(hasher), "sesame".into())
    }

    #[tokio::test]
    async fn succeeds_with_valid_key_and_password() {
        let mut user_repo = MockUserRepo::new();
        let mut hasher = MockPasswordHasherPort::new();
        user_repo
            .expect_get_by_username()
            .with(eq("admin@pharmstock.lk"))
            .returning(|_| Ok(Some(admin())));
        hasher
            .expect_verify()
            .with(eq("pw"), eq("$argon2id$hash"))
            .returning(|_, _| Ok(true));

        let user = use_case(user_repo, hasher)
            .execute("Admin@PharmStock.lk", "pw", "sesame")
            .await
            .expect("login");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn rejects_wrong_security_key_before_touching_the_store() {
        let user_repo = MockUserRepo::new();
        let hasher = MockPasswordHasherPort::new();

        let result = use_case(user_repo, hasher)
            .execute("admin@pharmstock.lk", "pw", "wrong")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidSecurityKey)));
    }

    #[tokio::test]
    async fn rejects_pharmacy_users() {
        let mut user_repo = MockUserRepo::new();
        let hasher = MockPasswordHasherPort::new();
        user_repo.expect_get_by_username().returning(|_| {
            let mut u = User::pending_pharmacy("owner@acme.lk", PharmacyId::new());
            u.activate("$argon2id$hash");
            Ok(Some(u))
        });

        let result = use_case(user_repo, hasher)
            .execute("owner@acme.lk", "pw", "sesame")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn rejects_bad_password() {
        let mut user_repo = MockUserRepo::new();
        let mut hasher = MockPasswordHasherPort::new();
        user_repo
            .expect_get_by_username()
            .returning(|_| Ok(Some(admin())));
        hasher.expect_verify().returning(|_, _| Ok(false));

        let result = use_case(user_repo, hasher)
            .execute("admin@pharmstock.lk", "nope", "sesame")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
