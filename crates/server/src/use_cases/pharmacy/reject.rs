//! Admin rejection with a mandatory reason.

use std::sync::Arc;

use pharmstock_domain::{DomainError, Pharmacy, PharmacyId};

use super::error::PharmacyError;
use crate::infrastructure::ports::{MailerPort, OutboundMail, PharmacyRepo};

pub struct RejectPharmacy {
    pharmacy_repo: Arc<dyn PharmacyRepo>,
    mailer: Arc<dyn MailerPort>,
}

impl RejectPharmacy {
    pub fn new(pharmacy_repo: Arc<dyn PharmacyRepo>, mailer: Arc<dyn MailerPort>) -> Self {
        Self {
            pharmacy_repo,
            mailer,
        }
    }

    pub async fn execute(&self, id: PharmacyId, reason: &str) -> Result<Pharmacy, PharmacyError> {
        let mut pharmacy = self
            .pharmacy_repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pharmacy", id.to_string()))?;
        pharmacy.reject(reason)?;
        self.pharmacy_repo.save(&pharmacy).await?;

        // Best-effort notice; the rejection stands even if the mail bounces.
        let notice = OutboundMail {
            to: pharmacy.email.clone(),
            subject: "Your PharmStock registration was not approved".into(),
            body: format!(
                "Hello {},\n\nYour registration could not be approved.\nReason: {}\n",
                pharmacy.display_name(),
                reason.trim()
            ),
        };
        if let Err(e) = self.mailer.send(notice).await {
            tracing::warn!(pharmacy_id = %pharmacy.id, error = %e, "Failed to send rejection notice");
        }

        tracing::info!(pharmacy_id = %pharmacy.id, "Pharmacy rejected");
        Ok(pharmacy)
    }
}
