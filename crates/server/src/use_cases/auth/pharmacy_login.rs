//! Pharmacy portal login.

use std::sync::Arc;

use pharmstock_domain::{Role, User};

use super::error::AuthError;
use crate::infrastructure::ports::{PasswordHasherPort, UserRepo};

pub struct PharmacyLogin {
    user_repo: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasherPort>,
}

impl PharmacyLogin {
    pub fn new(user_repo: Arc<dyn UserRepo>, hasher: Arc<dyn PasswordHasherPort>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .user_repo
            .get_by_username(&username.trim().to_ascii_lowercase())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if user.role != Role::Pharmacy {
            return Err(AuthError::InvalidCredentials);
        }
        // A disabled account means the setup link was never redeemed; the
        // message tells the owner what to do rather than "bad password".
        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::AccountDisabled)?;
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

    fn active_user() -> User {
        let mut u = User::pending_pharmacy("owner@acme.lk", PharmacyId::new());
        u.activate("$argon2id$hash");
        u
    }

    #[tokio::test]
    async fn succeeds_for_enabled_pharmacy_user() {
        let mut user_repo = MockUserRepo::new();
        let mut hasher = MockPasswordHasherPort::new();
        user_repo
            .expect_get_by_username()
            .with(eq("owner@acme.lk"))
            .returning(|_| Ok(Some(active_user())));
        hasher.expect_verify().returning(|_, _| Ok(true));

        let user = PharmacyLogin::new(Arc::new(user_repo), Arc::new(hasher))
            .execute(" Owner@Acme.LK ", "pw")
            .await
            .expect("login");
        assert!(user.pharmacy_id.is_some());
    }

    #[tokio::test]
    async fn disabled_account_gets_instructive_error() {
        let mut user_repo = MockUserRepo::new();
        let hasher = MockPasswordHasherPort::new();
        user_repo
            .expect_get_by_username()
            .returning(|_| Ok(Some(User::pending_pharmacy("owner@acme.lk", PharmacyId::new()))));

        let result = PharmacyLogin::new(Arc::new(user_repo), Arc::new(hasher))
            .execute("owner@acme.lk", "pw")
            .await;
        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn unknown_user_is_invalid_credentials() {
        let mut user_repo = MockUserRepo::new();
        let hasher = MockPasswordHasherPort::new();
        user_repo.expect_get_by_username().returning(|_| Ok(None));

        let result = PharmacyLogin::new(Arc::new(user_repo), Arc::new(hasher))
            .execute("ghost@x.lk", "pw")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
