//! Public storefront listing: every approved pharmacy that carries stock,
//! with its inventory and map position when one was captured.

use std::sync::Arc;

use pharmstock_domain::{Pharmacy, PharmacyLocation, PharmacyStatus};

use super::error::ListingError;
use crate::infrastructure::ports::{InventoryRepo, LocationRepo, PharmacyRepo, StockedMedicine};

#[derive(Debug, Clone)]
pub struct PharmacyListing {
    pub pharmacy: Pharmacy,
    pub location: Option<PharmacyLocation>,
    pub inventory: Vec<StockedMedicine>,
}

pub struct PublicInventoryListing {
    pharmacy_repo: Arc<dyn PharmacyRepo>,
    inventory_repo: Arc<dyn InventoryRepo>,
    location_repo: Arc<dyn LocationRepo>,
}

impl PublicInventoryListing {
    pub fn new(
        pharmacy_repo: Arc<dyn PharmacyRepo>,
        inventory_repo: Arc<dyn InventoryRepo>,
        location_repo: Arc<dyn LocationRepo>,
    ) -> Self {
        Self {
            pharmacy_repo,
            inventory_repo,
            location_repo,
        }
    }

    pub async fn execute(&self) -> Result<Vec<PharmacyListing>, ListingError> {
        let pharmacies = self.pharmacy_repo.list_with_inventory().await?;
        let mut listings = Vec::with_capacity(pharmacies.len());
        for pharmacy in pharmacies {
            // list_with_inventory does not filter by status; hide anything
            // that is not publicly visible.
            if pharmacy.status != PharmacyStatus::Approved {
                continue;
            }
            let inventory = self.inventory_repo.list_for_pharmacy(pharmacy.id).await?;
            let location = self.location_repo.get_for_pharmacy(pharmacy.id).await?;
            listings.push(PharmacyListing {
                pharmacy,
                location,
                inventory,
            });
        }
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockInventoryRepo, MockLocationRepo, MockPharmacyRepo};
    use chrono::{NaiveDate, Utc};
    use pharmstock_domain::{InventoryItem, Medicine, PharmacyRegistration};

    fn pharmacy(n: u32, status: PharmacyStatus) -> Pharmacy {
        let mut p = Pharmacy::register(
            PharmacyRegistration {
                legal_entity_name: format!("Pharmacy {n}"),
                trade_name: None,
                nmra_license: format!("NMRA-{n}"),
                business_reg_no: format!("BR-{n}"),
                address: "1 Main St".into(),
                telephone: "+94110000000".into(),
                email: format!("p{n}@example.lk"),
                entity_type: "Sole Proprietor".into(),
                contact_full_name: "A. Person".into(),
                contact_title: "Owner".into(),
                contact_phone: "+94770000000".into(),
                contact_email: "a@example.lk".into(),
                declaration_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("date"),
                agreed_to_declaration: true,
            },
            Utc::now(),
        )
        .expect("valid");
        p.status = status;
        p
    }

    #[tokio::test]
    async fn lists_approved_pharmacies_with_stock_and_location() {
        let approved = pharmacy(1, PharmacyStatus::Approved);
        let approved_id = approved.id;
        let pending = pharmacy(2, PharmacyStatus::Pending);

        let mut pharmacy_repo = MockPharmacyRepo::new();
        pharmacy_repo
            .expect_list_with_inventory()
            .returning(move || Ok(vec![approved.clone(), pending.clone()]));

        let mut inventory_repo = MockInventoryRepo::new();
        inventory_repo.expect_list_for_pharmacy().returning(move |pid| {
            let medicine = Medicine::new("19/07/1234", Utc::now()).expect("valid fixture");
            let item =
                InventoryItem::new(pid, medicine.id, 12, 1500, Utc::now()).expect("valid");
            Ok(vec![StockedMedicine { item, medicine }])
        });

        let mut location_repo = MockLocationRepo::new();
        location_repo.expect_get_for_pharmacy().returning(|pid| {
            Ok(Some(
                PharmacyLocation::new(pid, 6.9271, 79.8612).expect("valid"),
            ))
        });

        let listings = PublicInventoryListing::new(
            Arc::new(pharmacy_repo),
            Arc::new(inventory_repo),
            Arc::new(location_repo),
        )
        .execute()
        .await
        .expect("listed");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].pharmacy.id, approved_id);
        assert_eq!(listings[0].inventory.len(), 1);
        assert!(listings[0].location.is_some());
    }
}
