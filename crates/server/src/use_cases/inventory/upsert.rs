//! Add a catalog medicine to a pharmacy's inventory, or restock it if the
//! pharmacy already carries it. Either path leaves an activity entry.

use std::sync::Arc;

use pharmstock_domain::{
    ActivityAction, DomainError, InventoryActivity, InventoryItem, MedicineId, PharmacyId,
};

use super::error::InventoryError;
use crate::infrastructure::ports::{ActivityRepo, ClockPort, InventoryRepo, MedicineRepo};

#[derive(Debug, Clone, Copy)]
pub struct StockRequest {
    pub medicine_id: MedicineId,
    pub quantity: i64,
    pub price_cents: i64,
}

pub struct UpsertInventoryItem {
    inventory_repo: Arc<dyn InventoryRepo>,
    medicine_repo: Arc<dyn MedicineRepo>,
    activity_repo: Arc<dyn ActivityRepo>,
    clock: Arc<dyn ClockPort>,
}

impl UpsertInventoryItem {
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
        request: StockRequest,
    ) -> Result<InventoryItem, InventoryError> {
        let medicine = self
            .medicine_repo
            .get(request.medicine_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Medicine", request.medicine_id.to_string()))?;

        let now = self.clock.now();
        let (item, action) = match self
            .inventory_repo
            .get_for_medicine(pharmacy_id, request.medicine_id)
            .await?
        {
            Some(mut existing) => {
                existing.restock(request.quantity, request.price_cents, now)?;
                (existing, ActivityAction::Updated)
            }
            None => (
                InventoryItem::new(
                    pharmacy_id,
                    request.medicine_id,
                    request.quantity,
                    request.price_cents,
                    now,
                )?,
                ActivityAction::Added,
            ),
        };

        self.inventory_repo.save(&item).await?;

        let verb = match action {
            ActivityAction::Added => "Added",
            _ => "Updated",
        };
        let activity = InventoryActivity::record(
            pharmacy_id,
            Some(medicine.id),
            action,
            format!("{verb} {} (qty {})", medicine.display_name(), item.quantity),
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
    use pharmstock_domain::Medicine;

    struct Mocks {
        inventory_repo: MockInventoryRepo,
        medicine_repo: MockMedicineRepo,
        activity_repo: MockActivityRepo,
        clock: MockClockPort,
    }

    impl Mocks {
        fn new() -> Self {
            let mut clock = MockClockPort::new();
            clock.expect_now().returning(Utc::now);
            Self {
                inventory_repo: MockInventoryRepo::new(),
                medicine_repo: MockMedicineRepo::new(),
                activity_repo: MockActivityRepo::new(),
                clock,
            }
        }

        fn build(self) -> UpsertInventoryItem {
            UpsertInventoryItem::new(
                Arc::new(self.inventory_repo),
                Arc::new(self.medicine_repo),
                Arc::new(self.activity_repo),
                Arc::new(self.clock),
            )
        }
    }

    fn paracetamol() -> Medicine {
        let mut m = Medicine::new("19/07/1234", Utc::now()).expect("valid fixture");
        m.generic_name = Some("Paracetamol".into());
        m.dosage = Some("500mg".into());
        m
    }

    #[tokio::test]
    async fn new_medicine_creates_item_and_logs_added() {
        let mut mocks = Mocks::new();
        let medicine = paracetamol();
        let medicine_id = medicine.id;
        let pharmacy_id = PharmacyId::new();

        mocks
            .medicine_repo
            .expect_get()
            .with(eq(medicine_id))
            .returning(move |_| Ok(Some(medicine.clone())));
        mocks
            .inventory_repo
            .expect_get_for_medicine()
            .returning(|_, _| Ok(None));
        mocks
            .inventory_repo
            .expect_save()
            .withf(|item| item.quantity == 40 && item.price_cents == 1250)
            .returning(|_| Ok(()));
        mocks
            .activity_repo
            .expect_append()
            .withf(move |a| {
                a.action == ActivityAction::Added
                    && a.medicine_id == Some(medicine_id)
                    && a.message == "Added Paracetamol 500mg (qty 40)"
            })
            .returning(|_| Ok(()));

        let item = mocks
            .build()
            .execute(
                pharmacy_id,
                StockRequest {
                    medicine_id,
                    quantity: 40,
                    price_cents: 1250,
                },
            )
            .await
            .expect("stocked");
        assert_eq!(item.pharmacy_id, pharmacy_id);
    }

    #[tokio::test]
    async fn existing_row_is_restocked_and_logs_updated() {
        let mut mocks = Mocks::new();
        let medicine = paracetamol();
        let medicine_id = medicine.id;
        let pharmacy_id = PharmacyId::new();
        let existing =
            InventoryItem::new(pharmacy_id, medicine_id, 5, 1000, Utc::now()).expect("valid");
        let existing_id = existing.id;

        mocks
            .medicine_repo
            .expect_get()
            .returning(move |_| Ok(Some(medicine.clone())));
        mocks
            .inventory_repo
            .expect_get_for_medicine()
            .with(eq(pharmacy_id), eq(medicine_id))
            .returning(move |_, _| Ok(Some(existing.clone())));
        mocks
            .inventory_repo
            .expect_save()
            .withf(move |item| item.id == existing_id && item.quantity == 80)
            .returning(|_| Ok(()));
        mocks
            .activity_repo
            .expect_append()
            .withf(|a| a.action == ActivityAction::Updated)
            .returning(|_| Ok(()));

        let item = mocks
            .build()
            .execute(
                pharmacy_id,
                StockRequest {
                    medicine_id,
                    quantity: 80,
                    price_cents: 1100,
                },
            )
            .await
            .expect("restocked");
        assert_eq!(item.id, existing_id);
    }

    #[tokio::test]
    async fn unknown_medicine_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.medicine_repo.expect_get().returning(|_| Ok(None));

        let result = mocks
            .build()
            .execute(
                PharmacyId::new(),
                StockRequest {
                    medicine_id: MedicineId::new(),
                    quantity: 1,
                    price_cents: 100,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(InventoryError::Domain(DomainError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected() {
        let mut mocks = Mocks::new();
        let medicine = paracetamol();
        let medicine_id = medicine.id;
        mocks
            .medicine_repo
            .expect_get()
            .returning(move |_| Ok(Some(medicine.clone())));
        mocks
            .inventory_repo
            .expect_get_for_medicine()
            .returning(|_, _| Ok(None));

        let result = mocks
            .build()
            .execute(
                PharmacyId::new(),
                StockRequest {
                    medicine_id,
                    quantity: -1,
                    price_cents: 100,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(InventoryError::Domain(DomainError::Validation(_)))
        ));
    }
}
