pub mod error;
pub mod remove;
pub mod update;
pub mod upsert;

use std::sync::Arc;

pub use error::InventoryError;
pub use remove::RemoveInventoryItem;
pub use update::UpdateInventoryItem;
pub use upsert::{StockRequest, UpsertInventoryItem};

pub struct InventoryUseCases {
    pub upsert: Arc<UpsertInventoryItem>,
    pub update: Arc<UpdateInventoryItem>,
    pub remove: Arc<RemoveInventoryItem>,
}

impl InventoryUseCases {
    pub fn new(
        upsert: Arc<UpsertInventoryItem>,
        update: Arc<UpdateInventoryItem>,
        remove: Arc<RemoveInventoryItem>,
    ) -> Self {
        Self {
            upsert,
            update,
            remove,
        }
    }
}
