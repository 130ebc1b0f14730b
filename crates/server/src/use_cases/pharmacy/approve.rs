//! Admin approval: flips the application to APPROVED, creates the disabled
//! portal account and emails a single-use setup link.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pharmstock_domain::{DomainError, PharmacyId, SetupToken, TokenPurpose, User};

use super::error::PharmacyError;
use crate::infrastructure::ports::{
    ClockPort, MailerPort, OutboundMail, PharmacyRepo, TokenRepo, UserRepo,
};
use crate::use_cases::auth::tokens::mint_token;

#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub username: String,
    pub setup_link: String,
    pub expires_at: DateTime<Utc>,
}

pub struct ApprovePharmacy {
    pharmacy_repo: Arc<dyn PharmacyRepo>,
    user_repo: Arc<dyn UserRepo>,
    token_repo: Arc<dyn TokenRepo>,
    mailer: Arc<dyn MailerPort>,
    clock: Arc<dyn ClockPort>,
    setup_base_url: String,
}

impl ApprovePharmacy {
    pub fn new(
        pharmacy_repo: Arc<dyn PharmacyRepo>,
        user_repo: Arc<dyn UserRepo>,
        token_repo: Arc<dyn TokenRepo>,
        mailer: Arc<dyn MailerPort>,
        clock: Arc<dyn ClockPort>,
        setup_base_url: String,
    ) -> Self {
        Self {
            pharmacy_repo,
            user_repo,
            token_repo,
            mailer,
            clock,
            setup_base_url,
        }
    }

    pub async fn execute(&self, id: PharmacyId) -> Result<ApprovalOutcome, PharmacyError> {
        let mut pharmacy = self
            .pharmacy_repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pharmacy", id.to_string()))?;
        pharmacy.approve()?;

        if self
            .user_repo
            .get_by_username(&pharmacy.email)
            .await?
            .is_some()
        {
            return Err(DomainError::duplicate("Portal account").into());
        }

        let now = self.clock.now();
        let user = User::pending_pharmacy(pharmacy.email.clone(), pharmacy.id);
        let material = mint_token();
        let token = SetupToken::issue(user.id, material.hash, TokenPurpose::Setup, now);
        let setup_link = format!("{}?token={}", self.setup_base_url, material.raw);

        self.pharmacy_repo.save(&pharmacy).await?;
        self.user_repo.save(&user).await?;
        self.token_repo.save(&token).await?;

        self.mailer
            .send(OutboundMail {
                to: pharmacy.email.clone(),
                subject: "Your PharmStock registration was approved".into(),
                body: format!(
                    "Hello {},\n\n\
                     Your registration has been approved. Set your password within 48 hours \
                     to activate the portal account:\n\n{setup_link}\n",
                    pharmacy.display_name()
                ),
            })
            .await?;

        tracing::info!(pharmacy_id = %pharmacy.id, user_id = %user.id, "Pharmacy approved");
        Ok(ApprovalOutcome {
            username: user.username,
            setup_link,
            expires_at: token.expires_at,
        })
    }
}
