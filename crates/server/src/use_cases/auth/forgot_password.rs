//! Password reset requests. Always succeeds from the caller's point of
//! view so the endpoint cannot be used to probe which emails exist.

use std::sync::Arc;

use pharmstock_domain::{Role, SetupToken, TokenPurpose};

use super::error::AuthError;
use super::tokens::mint_token;
use crate::infrastructure::ports::{ClockPort, MailerPort, OutboundMail, TokenRepo, UserRepo};

pub struct ForgotPassword {
    user_repo: Arc<dyn UserRepo>,
    token_repo: Arc<dyn TokenRepo>,
    mailer: Arc<dyn MailerPort>,
    clock: Arc<dyn ClockPort>,
    reset_base_url: String,
}

impl ForgotPassword {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        token_repo: Arc<dyn TokenRepo>,
        mailer: Arc<dyn MailerPort>,
        clock: Arc<dyn ClockPort>,
        reset_base_url: String,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            mailer,
            clock,
            reset_base_url,
        }
    }

    pub async fn execute(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let Some(user) = self.user_repo.get_by_username(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };
        if user.role != Role::Pharmacy || !user.enabled {
            return Ok(());
        }

        let material = mint_token();
        let token = SetupToken::issue(
            user.id,
            material.hash,
            TokenPurpose::Reset,
            self.clock.now(),
        );
        self.token_repo.save(&token).await?;

        let link = format!("{}?token={}", self.reset_base_url, material.raw);
        self.mailer
            .send(OutboundMail {
                to: user.username.clone(),
                subject: "PharmStock password reset".into(),
                body: format!(
                    "A password reset was requested for your account.\n\n\
                     Reset your password within 1 hour: {link}\n\n\
                     If you did not request this, you can ignore this email."
                ),
            })
            .await?;
        tracing::info!(user_id = %user.id, "Issued password reset token");
        Ok(())
    }
}
