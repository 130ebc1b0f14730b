pub mod error;
pub mod manage;
pub mod search;
pub mod suggest;
pub mod summary;

use std::sync::Arc;

pub use error::CatalogError;
pub use manage::{ManageCatalog, MedicineDraft};
pub use search::SearchCatalog;
pub use suggest::SuggestMedicines;
pub use summary::{DashboardSummary, DashboardSummaryQuery};

pub struct CatalogUseCases {
    pub manage: Arc<ManageCatalog>,
    pub search: Arc<SearchCatalog>,
    pub suggest: Arc<SuggestMedicines>,
    pub summary: Arc<DashboardSummaryQuery>,
}

impl CatalogUseCases {
    pub fn new(
        manage: Arc<ManageCatalog>,
        search: Arc<SearchCatalog>,
        suggest: Arc<SuggestMedicines>,
        summary: Arc<DashboardSummaryQuery>,
    ) -> Self {
        Self {
            manage,
            search,
            suggest,
            summary,
        }
    }
}
