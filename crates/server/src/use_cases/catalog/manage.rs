//! Admin CRUD over the shared medicine master catalog.

use std::sync::Arc;

use chrono::NaiveDate;
use pharmstock_domain::{CatalogStatus, DomainError, Medicine, MedicineId};

use super::error::CatalogError;
use crate::infrastructure::ports::{ClockPort, MedicineRepo};

/// Catalog fields as submitted by the admin forms. Everything except the
/// registration number is optional.
#[derive(Debug, Clone, Default)]
pub struct MedicineDraft {
    pub reg_no: String,
    pub generic_name: Option<String>,
    pub brand_name: Option<String>,
    pub dosage: Option<String>,
    pub pack_size: Option<String>,
    pub pack_type: Option<String>,
    pub manufacturer: Option<String>,
    pub country: Option<String>,
    pub agent: Option<String>,
    pub reg_date: Option<NaiveDate>,
    pub schedule: Option<String>,
    pub validation: Option<String>,
    pub dossier_no: Option<String>,
    pub status: Option<CatalogStatus>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn apply_draft(medicine: &mut Medicine, draft: MedicineDraft) {
    medicine.generic_name = clean(draft.generic_name);
    medicine.brand_name = clean(draft.brand_name);
    medicine.dosage = clean(draft.dosage);
    medicine.pack_size = clean(draft.pack_size);
    medicine.pack_type = clean(draft.pack_type);
    medicine.manufacturer = clean(draft.manufacturer);
    medicine.country = clean(draft.country);
    medicine.agent = clean(draft.agent);
    medicine.reg_date = draft.reg_date;
    medicine.schedule = clean(draft.schedule);
    medicine.validation = clean(draft.validation);
    medicine.dossier_no = clean(draft.dossier_no);
    if let Some(status) = draft.status {
        medicine.status = status;
    }
}

pub struct ManageCatalog {
    medicine_repo: Arc<dyn MedicineRepo>,
    clock: Arc<dyn ClockPort>,
}

impl ManageCatalog {
    pub fn new(medicine_repo: Arc<dyn MedicineRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            medicine_repo,
            clock,
        }
    }

    pub async fn get(&self, id: MedicineId) -> Result<Medicine, CatalogError> {
        self.medicine_repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Medicine", id.to_string()).into())
    }

    pub async fn create(&self, draft: MedicineDraft) -> Result<Medicine, CatalogError> {
        let mut medicine = Medicine::new(draft.reg_no.clone(), self.clock.now())?;
        if self
            .medicine_repo
            .get_by_reg_no(&medicine.reg_no)
            .await?
            .is_some()
        {
            return Err(DomainError::duplicate("Registration number").into());
        }
        apply_draft(&mut medicine, draft);
        self.medicine_repo.save(&medicine).await?;
        tracing::info!(medicine_id = %medicine.id, reg_no = %medicine.reg_no, "Catalog entry created");
        Ok(medicine)
    }

    pub async fn update(
        &self,
        id: MedicineId,
        draft: MedicineDraft,
    ) -> Result<Medicine, CatalogError> {
        let mut medicine = self
            .medicine_repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Medicine", id.to_string()))?;

        let new_reg_no = draft.reg_no.trim().to_string();
        if new_reg_no.is_empty() {
            return Err(DomainError::validation("Registration number is required").into());
        }
        // The uniqueness check only matters when the reg number actually moves.
        if new_reg_no != medicine.reg_no {
            if self
                .medicine_repo
                .get_by_reg_no(&new_reg_no)
                .await?
                .is_some()
            {
                return Err(DomainError::duplicate("Registration number").into());
            }
            medicine.reg_no = new_reg_no;
        }

        apply_draft(&mut medicine, draft);
        self.medicine_repo.save(&medicine).await?;
        Ok(medicine)
    }

    pub async fn delete(&self, id: MedicineId) -> Result<(), CatalogError> {
        if self.medicine_repo.get(id).await?.is_none() {
            return Err(DomainError::not_found("Medicine", id.to_string()).into());
        }
        self.medicine_repo.delete(id).await?;
        tracing::info!(medicine_id = %id, "Catalog entry deleted");
        Ok(())
    }
}
