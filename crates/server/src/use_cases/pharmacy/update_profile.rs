//! Self-service profile edits for an approved pharmacy.
//!
//! Registration facts (license, business registration, legal name) are
//! immutable after submission; only presentation and contact fields move here.

use std::sync::Arc;

use pharmstock_domain::{DomainError, Pharmacy, PharmacyId};

use super::error::PharmacyError;
use crate::infrastructure::ports::PharmacyRepo;

/// Fields a pharmacy may change on its own profile. `None` leaves the
/// current value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub trade_name: Option<String>,
    pub telephone: Option<String>,
    pub contact_full_name: Option<String>,
    pub contact_title: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub about: Option<String>,
    pub opening_hours_json: Option<String>,
}

pub struct UpdatePharmacyProfile {
    pharmacy_repo: Arc<dyn PharmacyRepo>,
}

impl UpdatePharmacyProfile {
    pub fn new(pharmacy_repo: Arc<dyn PharmacyRepo>) -> Self {
        Self { pharmacy_repo }
    }

    pub async fn execute(
        &self,
        id: PharmacyId,
        update: ProfileUpdate,
    ) -> Result<Pharmacy, PharmacyError> {
        let mut pharmacy = self
            .pharmacy_repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pharmacy", id.to_string()))?;

        if let Some(trade_name) = update.trade_name {
            let trimmed = trade_name.trim().to_string();
            pharmacy.trade_name = (!trimmed.is_empty()).then_some(trimmed);
        }
        if let Some(telephone) = update.telephone {
            let trimmed = telephone.trim();
            if trimmed.is_empty() {
                return Err(DomainError::validation("Telephone cannot be blank").into());
            }
            pharmacy.telephone = trimmed.to_string();
        }
        if let Some(name) = update.contact_full_name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(DomainError::validation("Contact name cannot be blank").into());
            }
            pharmacy.contact_full_name = trimmed.to_string();
        }
        if let Some(title) = update.contact_title {
            pharmacy.contact_title = title.trim().to_string();
        }
        if let Some(phone) = update.contact_phone {
            pharmacy.contact_phone = phone.trim().to_string();
        }
        if let Some(email) = update.contact_email {
            let trimmed = email.trim().to_ascii_lowercase();
            if trimmed.is_empty() {
                return Err(DomainError::validation("Contact email cannot be blank").into());
            }
            pharmacy.contact_email = trimmed;
        }
        if let Some(about) = update.about {
            let trimmed = about.trim().to_string();
            pharmacy.about = (!trimmed.is_empty()).then_some(trimmed);
        }
        if let Some(hours) = update.opening_hours_json {
            // Stored verbatim, but it has to at least parse as JSON.
            if serde_json::from_str::<serde_json::Value>(&hours).is_err() {
                return Err(DomainError::validation("Opening hours must be valid JSON").into());
            }
            pharmacy.opening_hours_json = Some(hours);
        }

        self.pharmacy_repo.save(&pharmacy).await?;
        Ok(pharmacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockPharmacyRepo;
    use chrono::{NaiveDate, Utc};
    use pharmstock_domain::PharmacyRegistration;

    fn stored_pharmacy() -> Pharmacy {
        Pharmacy::register(
            PharmacyRegistration {
                legal_entity_name: "Acme Pharma".into(),
                trade_name: Some("Acme".into()),
                nmra_license: "NMRA-1".into(),
                business_reg_no: "BR-1".into(),
                address: "1 Main St".into(),
                telephone: "+94110000000".into(),
                email: "owner@acme.lk".into(),
                entity_type: "Sole Proprietor".into(),
                contact_full_name: "A. Person".into(),
                contact_title: "Owner".into(),
                contact_phone: "+94770000000".into(),
                contact_email: "a@acme.lk".into(),
                declaration_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("date"),
                agreed_to_declaration: true,
            },
            Utc::now(),
        )
        .expect("valid")
    }

    #[tokio::test]
    async fn applies_only_provided_fields() {
        let mut repo = MockPharmacyRepo::new();
        let pharmacy = stored_pharmacy();
        let id = pharmacy.id;
        repo.expect_get()
            .returning(move |_| Ok(Some(pharmacy.clone())));
        repo.expect_save()
            .withf(|p| {
                p.about.as_deref() == Some("Open since 1994")
                    && p.telephone == "+94110000000"
                    && p.trade_name.as_deref() == Some("Acme")
            })
            .returning(|_| Ok(()));

        let updated = UpdatePharmacyProfile::new(Arc::new(repo))
            .execute(
                id,
                ProfileUpdate {
                    about: Some("Open since 1994".into()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .expect("updated");
        assert_eq!(updated.about.as_deref(), Some("Open since 1994"));
    }

    #[tokio::test]
    async fn rejects_malformed_opening_hours() {
        let mut repo = MockPharmacyRepo::new();
        let pharmacy = stored_pharmacy();
        let id = pharmacy.id;
        repo.expect_get()
            .returning(move |_| Ok(Some(pharmacy.clone())));

        let result = UpdatePharmacyProfile::new(Arc::new(repo))
            .execute(
                id,
                ProfileUpdate {
                    opening_hours_json: Some("{not json".into()),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(PharmacyError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn rejects_blank_telephone() {
        let mut repo = MockPharmacyRepo::new();
        let pharmacy = stored_pharmacy();
        let id = pharmacy.id;
        repo.expect_get()
            .returning(move |_| Ok(Some(pharmacy.clone())));

        let result = UpdatePharmacyProfile::new(Arc::new(repo))
            .execute(
                id,
                ProfileUpdate {
                    telephone: Some("  ".into()),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(PharmacyError::Domain(DomainError::Validation(_)))
        ));
    }
}
