use pharmstock_domain::DomainError;

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    /// The item belongs to a different pharmacy.
    #[error("Inventory item belongs to another pharmacy")]
    Forbidden,
}
