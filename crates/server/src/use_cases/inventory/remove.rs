//! Remove a medicine from a pharmacy's inventory.

use std::sync::Arc;

use pharmstock_domain::{
    ActivityAction, DomainError, InventoryActivity, InventoryItemId, PharmacyId,
};

use super::error::InventoryError;
use crate::infrastructure::ports::{ActivityRepo, ClockPort, InventoryRepo, MedicineRepo};

pub struct RemoveInventoryItem {
    inventory_repo: Arc<dyn InventoryRepo>,
    medicine_repo: Arc<dyn MedicineRepo>,
    activity_repo: Arc<dyn ActivityRepo>,
    clock: Arc<dyn ClockPort>,
}

impl RemoveInventoryItem {
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
    ) -> Result<(), InventoryError> {
        let item = self
            .inventory_repo
            .get(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", item_id.to_string()))?;
        if item.pharmacy_id != pharmacy_id {
            return Err(InventoryError::Forbidden);
        }

        let name = match self.medicine_repo.get(item.medicine_id).await? {
            Some(medicine) => medicine.display_name(),
            None => item.medicine_id.to_string(),
        };
        // Log before deleting so the entry survives even if nothing else does.
        let activity = InventoryActivity::record(
            pharmacy_id,
            Some(item.medicine_id),
            ActivityAction::Deleted,
            format!("Removed {name}"),
            self.clock.now(),
        );
        self.activity_repo.append(&activity).await?;
        self.inventory_repo.delete(item_id).await?;

        Ok(())
    }
}
