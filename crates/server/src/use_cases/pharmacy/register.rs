//! Public pharmacy registration.

use std::sync::Arc;

use pharmstock_domain::{DomainError, Pharmacy, PharmacyRegistration};

use super::error::PharmacyError;
use crate::infrastructure::ports::{ClockPort, PharmacyRepo};

pub struct RegisterPharmacy {
    pharmacy_repo: Arc<dyn PharmacyRepo>,
    clock: Arc<dyn ClockPort>,
}

impl RegisterPharmacy {
    pub fn new(pharmacy_repo: Arc<dyn PharmacyRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            pharmacy_repo,
            clock,
        }
    }

    pub async fn execute(&self, form: PharmacyRegistration) -> Result<Pharmacy, PharmacyError> {
        let license = form.nmra_license.trim().to_string();
        let email = form.email.trim().to_ascii_lowercase();

        if self.pharmacy_repo.exists_nmra_license(&license).await? {
            return Err(DomainError::duplicate("NMRA license").into());
        }
        if self.pharmacy_repo.exists_email(&email).await? {
            return Err(DomainError::duplicate("Pharmacy email").into());
        }

        let pharmacy = Pharmacy::register(form, self.clock.now())?;
        self.pharmacy_repo.save(&pharmacy).await?;
        tracing::info!(pharmacy_id = %pharmacy.id, "Pharmacy registration submitted");
        Ok(pharmacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockClockPort, MockPharmacyRepo};
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::*;
    use pharmstock_domain::PharmacyStatus;

    fn form() -> PharmacyRegistration {
        PharmacyRegistration {
            legal_entity_name: "Acme Pharma".into(),
            trade_name: None,
            nmra_license: "NMRA-1".into(),
            business_reg_no: "BR-1".into(),
            address: "1 Main St".into(),
            telephone: "+94110000000".into(),
            email: "Owner@Acme.lk".into(),
            entity_type: "Sole Proprietor".into(),
            contact_full_name: "A. Person".into(),
            contact_title: "Owner".into(),
            contact_phone: "+94770000000".into(),
            contact_email: "a@acme.lk".into(),
            declaration_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("date"),
            agreed_to_declaration: true,
        }
    }

    fn clock() -> MockClockPort {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(Utc::now);
        clock
    }

    #[tokio::test]
    async fn saves_pending_application() {
        let mut repo = MockPharmacyRepo::new();
        repo.expect_exists_nmra_license()
            .with(eq("NMRA-1"))
            .returning(|_| Ok(false));
        repo.expect_exists_email()
            .with(eq("owner@acme.lk"))
            .returning(|_| Ok(false));
        repo.expect_save()
            .withf(|p| p.status == PharmacyStatus::Pending)
            .returning(|_| Ok(()));

        let pharmacy = RegisterPharmacy::new(Arc::new(repo), Arc::new(clock()))
            .execute(form())
            .await
            .expect("registered");
        assert_eq!(pharmacy.email, "owner@acme.lk");
    }

    #[tokio::test]
    async fn duplicate_license_is_a_conflict() {
        let mut repo = MockPharmacyRepo::new();
        repo.expect_exists_nmra_license().returning(|_| Ok(true));

        let result = RegisterPharmacy::new(Arc::new(repo), Arc::new(clock()))
            .execute(form())
            .await;
        assert!(matches!(
            result,
            Err(PharmacyError::Domain(DomainError::Duplicate(_)))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let mut repo = MockPharmacyRepo::new();
        repo.expect_exists_nmra_license().returning(|_| Ok(false));
        repo.expect_exists_email().returning(|_| Ok(true));

        let result = RegisterPharmacy::new(Arc::new(repo), Arc::new(clock()))
            .execute(form())
            .await;
        assert!(matches!(
            result,
            Err(PharmacyError::Domain(DomainError::Duplicate(_)))
        ));
    }
}
