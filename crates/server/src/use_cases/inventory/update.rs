//! Restock an existing inventory row by its id.

use std::sync::Arc;

use pharmstock_domain::{
    ActivityAction, DomainError, InventoryActivity, InventoryItem, InventoryItemId, PharmacyId,
};

use super::error::InventoryError;
use crate::infrastructure::ports::{ActivityRepo, ClockPort, InventoryRepo, MedicineRepo};

pub struct UpdateInventoryItem {
    inventory_repo: Arc<dyn InventoryRepo>,
    medicine_repo: Arc<dyn MedicineRepo>,
    activity_repo: Arc<dyn ActivityRepo>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateInventoryItem {
    pub fn new(
        inventory_repo: Arc<dyn InventoryRepo>,
        medicine_repo: Arc<dyn MedicineRepo>,
        activity_repo: Arc<dyn ActivityRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            inventory_repo,
            medicine_repo,
            activity_repo,
            clock,
        }
    }

    pub async fn execute(
        &self,
        pharmacy_id: PharmacyId,
        item_id: InventoryItemId,
        quantity: i64,
        price_cents: i64,
    ) -> Result<InventoryItem, InventoryError> {
        let mut item = self
            .inventory_repo
            .get(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", item_id.to_string()))?;
        if item.pharmacy_id != pharmacy_id {
            return Err(InventoryError::Forbidden);
        }

        let now = self.clock.now();
        item.restock(quantity, price_cents, now)?;
        self.inventory_repo.save(&item).await?;

        let name = match self.medicine_repo.get(item.medicine_id).await? {
            Some(medicine) => medicine.display_name(),
            None => item.medicine_id.to_string(),
        };
        let activity = InventoryActivity::record(
            pharmacy_id,
            Some(item.medicine_id),
            ActivityAction::Updated,
            format!("Updated {name} (qty {quantity})"),
            now,
        );
        self.activity_repo.append(&activity).await?;

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockActivityRepo, MockClockPort, MockInventoryRepo, MockMedicineRepo,
    };
    use chrono::Utc;
    use mockall::predicate::*;
    use pharmstock_domain::{Medicine, MedicineId};

    fn use_case(
        inventory_repo: MockInventoryRepo,
        medicine_repo: MockMedicineRepo,
        activity_repo: MockActivityRepo,
    ) -> UpdateInventoryItem {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(Utc::now);
        UpdateInventoryItem::new(
            Arc::new(inventory_repo),
            Arc::new(medicine_repo),
            Arc::new(activity_repo),
            Arc::new(clock),
        )
    }

    #[tokio::test]
    async fn restocks_own_item_and_logs() {
        let pharmacy_id = PharmacyId::new();
        let medicine = Medicine::new("19/07/1234", Utc::now()).expect("valid fixture");
        let item =
            InventoryItem::new(pharmacy_id, medicine.id, 5, 1000, Utc::now()).expect("valid");
        let item_id = item.id;

        let mut inventory_repo = MockInventoryRepo::new();
        inventory_repo
            .expect_get()
            .with(eq(item_id))
            .returning(move |_| Ok(Some(item.clone())));
        inventory_repo
            .expect_save()
            .withf(|i| i.quantity == 30 && i.price_cents == 900)
            .returning(|_| Ok(()));
        let mut medicine_repo = MockMedicineRepo::new();
        medicine_repo
            .expect_get()
            .returning(move |_| Ok(Some(medicine.clone())));
        let mut activity_repo = MockActivityRepo::new();
        activity_repo
            .expect_append()
            .withf(|a| a.action == ActivityAction::Updated && a.message.contains("qty 30"))
            .returning(|_| Ok(()));

        let updated = use_case(inventory_repo, medicine_repo, activity_repo)
            .execute(pharmacy_id, item_id, 30, 900)
            .await
            .expect("updated");
        assert_eq!(updated.quantity, 30);
    }

    #[tokio::test]
    async fn foreign_item_is_forbidden() {
        let item = InventoryItem::new(PharmacyId::new(), MedicineId::new(), 5, 1000, Utc::now())
            .expect("valid");
        let item_id = item.id;
        let mut inventory_repo = MockInventoryRepo::new();
        inventory_repo
            .expect_get()
            .returning(move |_| Ok(Some(item.clone())));

        let result = use_case(inventory_repo, MockMedicineRepo::new(), MockActivityRepo::new())
            .execute(PharmacyId::new(), item_id, 1, 100)
            .await;
        assert!(matches!(result, Err(InventoryError::Forbidden)));
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let mut inventory_repo = MockInventoryRepo::new();
        inventory_repo.expect_get().returning(|_| Ok(None));

        let result = use_case(inventory_repo, MockMedicineRepo::new(), MockActivityRepo::new())
            .execute(PharmacyId::new(), InventoryItemId::new(), 1, 100)
            .await;
        assert!(matches!(
            result,
            Err(InventoryError::Domain(DomainError::NotFound { .. }))
        ));
    }
}
