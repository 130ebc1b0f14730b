//! Redeem a setup or reset token: set the password, enable the account and
//! record the pharmacy's location.

use std::sync::Arc;

use pharmstock_domain::{DomainError, PharmacyLocation};

use super::error::AuthError;
use super::tokens::sha256_hex;
use crate::infrastructure::ports::{
    ClockPort, LocationRepo, PasswordHasherPort, TokenRepo, UserRepo,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct SetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub struct SetPassword {
    token_repo: Arc<dyn TokenRepo>,
    user_repo: Arc<dyn UserRepo>,
    location_repo: Arc<dyn LocationRepo>,
    hasher: Arc<dyn PasswordHasherPort>,
    clock: Arc<dyn ClockPort>,
}

impl SetPassword {
    pub fn new(
        token_repo: Arc<dyn TokenRepo>,
        user_repo: Arc<dyn UserRepo>,
        location_repo: Arc<dyn LocationRepo>,
        hasher: Arc<dyn PasswordHasherPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            token_repo,
            user_repo,
            location_repo,
            hasher,
            clock,
        }
    }

    pub async fn execute(&self, request: SetPasswordRequest) -> Result<(), AuthError> {
        if request.password != request.confirm_password {
            return Err(DomainError::validation("Passwords do not match").into());
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let now = self.clock.now();
        let mut token = self
            .token_repo
            .get_by_hash(&sha256_hex(request.token.trim()))
            .await?
            .ok_or(AuthError::InvalidToken)?;
        token.mark_used(now).map_err(|_| AuthError::InvalidToken)?;

        let mut user = self
            .user_repo
            .get(token.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        let pharmacy_id = user.pharmacy_id.ok_or(AuthError::InvalidToken)?;

        let location = PharmacyLocation::new(pharmacy_id, request.latitude, request.longitude)?;
        user.activate(self.hasher.hash(&request.password)?);

        self.token_repo.save(&token).await?;
        self.user_repo.save(&user).await?;
        self.location_repo.upsert(&location).await?;

        tracing::info!(user_id = %user.id, purpose = %token.purpose, "Password set, account enabled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockClockPort, MockLocationRepo, MockPasswordHasherPort, MockTokenRepo, MockUserRepo,
    };
    use chrono::{Duration, Utc};
    use mockall::predicate::*;
    use pharmstock_domain::{PharmacyId, SetupToken, TokenPurpose, User};

    fn request(token: &str) -> SetPasswordRequest {
        SetPasswordRequest {
            token: token.into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            latitude: 6.9271,
            longitude: 79.8612,
        }
    }

    struct Mocks {
        token_repo: MockTokenRepo,
        user_repo: MockUserRepo,
        location_repo: MockLocationRepo,
        hasher: MockPasswordHasherPort,
        clock: MockClockPort,
    }

    impl Mocks {
        fn new() -> Self {
            let mut clock = MockClockPort::new();
            clock.expect_now().returning(Utc::now);
            Self {
                token_repo: MockTokenRepo::new(),
                user_repo: MockUserRepo::new(),
                location_repo: MockLocationRepo::new(),
                hasher: MockPasswordHasherPort::new(),
                clock,
            }
        }

        fn build(self) -> SetPassword {
            SetPassword::new(
                Arc::new(self.token_repo),
                Arc::new(self.user_repo),
                Arc::new(self.location_repo),
                Arc::new(self.hasher),
                Arc::new(self.clock),
            )
        }
    }

    #[tokio::test]
    async fn redeems_token_and_enables_account() {
        let mut mocks = Mocks::new();
        let user = User::pending_pharmacy("owner@acme.lk", PharmacyId::new());
        let user_id = user.id;
        let token = SetupToken::issue(
            user_id,
            sha256_hex("raw-token"),
            TokenPurpose::Setup,
            Utc::now(),
        );

        mocks
            .token_repo
            .expect_get_by_hash()
            .with(eq(sha256_hex("raw-token")))
            .returning(move |_| Ok(Some(token.clone())));
        mocks
            .user_repo
            .expect_get()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));
        mocks
            .hasher
            .expect_hash()
            .with(eq("longenough"))
            .returning(|_| Ok("$argon2id$new".into()));
        mocks
            .token_repo
            .expect_save()
            .withf(|t| t.used_at.is_some())
            .returning(|_| Ok(()));
        mocks
            .user_repo
            .expect_save()
            .withf(|u| u.enabled && u.password_hash.as_deref() == Some("$argon2id$new"))
            .returning(|_| Ok(()));
        mocks
            .location_repo
            .expect_upsert()
            .withf(|l| l.latitude == 6.9271)
            .returning(|_| Ok(()));

        mocks
            .build()
            .execute(request("raw-token"))
            .await
            .expect("set password");
    }

    #[tokio::test]
    async fn rejects_mismatched_passwords() {
        let mocks = Mocks::new();
        let mut req = request("raw-token");
        req.confirm_password = "different".into();
        let result = mocks.build().execute(req).await;
        assert!(matches!(result, Err(AuthError::Domain(_))));
    }

    #[tokio::test]
    async fn rejects_short_passwords() {
        let mocks = Mocks::new();
        let mut req = request("raw-token");
        req.password = "short".into();
        req.confirm_password = "short".into();
        assert!(mocks.build().execute(req).await.is_err());
    }

    #[tokio::test]
    async fn rejects_unknown_token() {
        let mut mocks = Mocks::new();
        mocks.token_repo.expect_get_by_hash().returning(|_| Ok(None));
        let result = mocks.build().execute(request("bogus")).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn rejects_used_or_expired_token() {
        let mut mocks = Mocks::new();
        let user_id = pharmstock_domain::UserId::new();
        let expired = SetupToken::issue(
            user_id,
            sha256_hex("raw-token"),
            TokenPurpose::Reset,
            Utc::now() - Duration::hours(3),
        );
        mocks
            .token_repo
            .expect_get_by_hash()
            .returning(move |_| Ok(Some(expired.clone())));

        let result = mocks.build().execute(request("raw-token")).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
