//! Repository port traits for database access.

use async_trait::async_trait;
use pharmstock_domain::{
    InventoryActivity, InventoryItem, InventoryItemId, Medicine, MedicineId, Pharmacy, PharmacyId,
    PharmacyLocation, SetupToken, User, UserId,
};

use super::error::RepoError;
use super::types::{
    MedicineFilter, MedicineSort, Page, Paged, PharmacyFilter, StockCounts, StockedMedicine,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicineRepo: Send + Sync {
    async fn get(&self, id: MedicineId) -> Result<Option<Medicine>, RepoError>;
    async fn get_by_reg_no(&self, reg_no: &str) -> Result<Option<Medicine>, RepoError>;
    async fn save(&self, medicine: &Medicine) -> Result<(), RepoError>;
    async fn delete(&self, id: MedicineId) -> Result<(), RepoError>;

    async fn list_all(&self) -> Result<Vec<Medicine>, RepoError>;
    async fn search(
        &self,
        filter: &MedicineFilter,
        sort: MedicineSort,
        page: Page,
    ) -> Result<Paged<Medicine>, RepoError>;
    /// Case-insensitive prefix match over generic and brand names.
    async fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<Medicine>, RepoError>;

    async fn distinct_manufacturers(&self) -> Result<Vec<String>, RepoError>;
    async fn distinct_brands(&self) -> Result<Vec<String>, RepoError>;
    async fn count(&self) -> Result<u64, RepoError>;

    /// Bulk insert for the bootstrap importer.
    async fn insert_batch(&self, medicines: &[Medicine]) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PharmacyRepo: Send + Sync {
    async fn get(&self, id: PharmacyId) -> Result<Option<Pharmacy>, RepoError>;
    async fn save(&self, pharmacy: &Pharmacy) -> Result<(), RepoError>;

    async fn exists_nmra_license(&self, license: &str) -> Result<bool, RepoError>;
    async fn exists_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Newest-first listing for the admin review screen.
    async fn list(&self, filter: &PharmacyFilter, page: Page) -> Result<Paged<Pharmacy>, RepoError>;
    async fn count_approved(&self) -> Result<u64, RepoError>;
    async fn count_pending(&self) -> Result<u64, RepoError>;

    /// Pharmacies holding at least one inventory row, for the public listing.
    async fn list_with_inventory(&self) -> Result<Vec<Pharmacy>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    async fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepoError>;
    async fn get_for_medicine(
        &self,
        pharmacy_id: PharmacyId,
        medicine_id: MedicineId,
    ) -> Result<Option<InventoryItem>, RepoError>;
    async fn save(&self, item: &InventoryItem) -> Result<(), RepoError>;
    async fn delete(&self, id: InventoryItemId) -> Result<(), RepoError>;

    /// Own rows newest-first, joined with the catalog medicine.
    async fn list_for_pharmacy(
        &self,
        pharmacy_id: PharmacyId,
    ) -> Result<Vec<StockedMedicine>, RepoError>;

    async fn stock_counts(&self) -> Result<StockCounts, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepo: Send + Sync {
    async fn append(&self, activity: &InventoryActivity) -> Result<(), RepoError>;
    async fn latest_for_pharmacy(
        &self,
        pharmacy_id: PharmacyId,
        limit: u32,
    ) -> Result<Vec<InventoryActivity>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepo: Send + Sync {
    async fn save(&self, token: &SetupToken) -> Result<(), RepoError>;
    async fn get_by_hash(&self, token_hash: &str) -> Result<Option<SetupToken>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepo: Send + Sync {
    async fn get_for_pharmacy(
        &self,
        pharmacy_id: PharmacyId,
    ) -> Result<Option<PharmacyLocation>, RepoError>;
    /// One location per pharmacy; replaces the previous row if present.
    async fn upsert(&self, location: &PharmacyLocation) -> Result<(), RepoError>;
}
