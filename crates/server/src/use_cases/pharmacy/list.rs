//! Admin review listing.

use std::sync::Arc;

use pharmstock_domain::Pharmacy;

use super::error::PharmacyError;
use crate::infrastructure::ports::{Page, Paged, PharmacyFilter, PharmacyRepo};

pub struct ListPharmacies {
    pharmacy_repo: Arc<dyn PharmacyRepo>,
}

impl ListPharmacies {
    pub fn new(pharmacy_repo: Arc<dyn PharmacyRepo>) -> Self {
        Self { pharmacy_repo }
    }

    pub async fn execute(
        &self,
        filter: PharmacyFilter,
        page: Page,
    ) -> Result<Paged<Pharmacy>, PharmacyError> {
        Ok(self.pharmacy_repo.list(&filter, page).await?)
    }
}
