//! Admin dashboard numbers.

use std::sync::Arc;

use serde::Serialize;

use super::error::CatalogError;
use crate::infrastructure::ports::{InventoryRepo, MedicineRepo, PharmacyRepo};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_medicines: u64,
    pub approved_pharmacies: u64,
    pub pending_pharmacies: u64,
    pub in_stock_items: u64,
    pub low_stock_items: u64,
    pub out_of_stock_items: u64,
}

pub struct DashboardSummaryQuery {
    medicine_repo: Arc<dyn MedicineRepo>,
    pharmacy_repo: Arc<dyn PharmacyRepo>,
    inventory_repo: Arc<dyn InventoryRepo>,
}

impl DashboardSummaryQuery {
    pub fn new(
        medicine_repo: Arc<dyn MedicineRepo>,
        pharmacy_repo: Arc<dyn PharmacyRepo>,
        inventory_repo: Arc<dyn InventoryRepo>,
    ) -> Self {
        Self {
            medicine_repo,
            pharmacy_repo,
            inventory_repo,
        }
    }

    pub async fn execute(&self) -> Result<DashboardSummary, CatalogError> {
        let total_medicines = self.medicine_repo.count().await?;
        let approved_pharmacies = self.pharmacy_repo.count_approved().await?;
        let pending_pharmacies = self.pharmacy_repo.count_pending().await?;
        let stock = self.inventory_repo.stock_counts().await?;

        Ok(DashboardSummary {
            total_medicines,
            approved_pharmacies,
            pending_pharmacies,
            in_stock_items: stock.in_stock,
            low_stock_items: stock.low_stock,
            out_of_stock_items: stock.out_of_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockInventoryRepo, MockMedicineRepo, MockPharmacyRepo, StockCounts,
    };

    #[tokio::test]
    async fn aggregates_counts_from_all_repos() {
        let mut medicine_repo = MockMedicineRepo::new();
        let mut pharmacy_repo = MockPharmacyRepo::new();
        let mut inventory_repo = MockInventoryRepo::new();
        medicine_repo.expect_count().returning(|| Ok(15_000));
        pharmacy_repo.expect_count_approved().returning(|| Ok(12));
        pharmacy_repo.expect_count_pending().returning(|| Ok(3));
        inventory_repo.expect_stock_counts().returning(|| {
            Ok(StockCounts {
                in_stock: 40,
                low_stock: 5,
                out_of_stock: 2,
            })
        });

        let summary = DashboardSummaryQuery::new(
            Arc::new(medicine_repo),
            Arc::new(pharmacy_repo),
            Arc::new(inventory_repo),
        )
        .execute()
        .await
        .expect("summary");
        assert_eq!(summary.total_medicines, 15_000);
        assert_eq!(summary.pending_pharmacies, 3);
        assert_eq!(summary.low_stock_items, 5);
    }
}
