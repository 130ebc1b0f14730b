//! Catalog browse: filtered, sorted, paged search plus the filter
//! dropdown sources.

use std::sync::Arc;

use pharmstock_domain::Medicine;

use super::error::CatalogError;
use crate::infrastructure::ports::{MedicineFilter, MedicineRepo, MedicineSort, Page, Paged};

pub struct SearchCatalog {
    medicine_repo: Arc<dyn MedicineRepo>,
}

impl SearchCatalog {
    pub fn new(medicine_repo: Arc<dyn MedicineRepo>) -> Self {
        Self { medicine_repo }
    }

    pub async fn execute(
        &self,
        filter: MedicineFilter,
        sort: MedicineSort,
        page: Page,
    ) -> Result<Paged<Medicine>, CatalogError> {
        Ok(self.medicine_repo.search(&filter, sort, page).await?)
    }

    pub async fn manufacturers(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.medicine_repo.distinct_manufacturers().await?)
    }

    pub async fn brands(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.medicine_repo.distinct_brands().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockMedicineRepo;

    #[tokio::test]
    async fn forwards_search_arguments() {
        let mut repo = MockMedicineRepo::new();
        repo.expect_search()
            .withf(|filter, _, page| filter.q.as_deref() == Some("para") && page.size == 20)
            .returning(|_, _, page| {
                Ok(Paged {
                    items: Vec::new(),
                    total: 0,
                    page: page.page,
                    size: page.size,
                })
            });

        let filter = MedicineFilter {
            q: Some("para".into()),
            ..MedicineFilter::default()
        };
        let paged = SearchCatalog::new(Arc::new(repo))
            .execute(filter, MedicineSort::default(), Page::new(None, None))
            .await
            .expect("searched");
        assert_eq!(paged.total, 0);
    }

    #[tokio::test]
    async fn surfaces_dropdown_sources() {
        let mut repo = MockMedicineRepo::new();
        repo.expect_distinct_manufacturers()
            .returning(|| Ok(vec!["GSK".into(), "Hemas".into()]));

        let manufacturers = SearchCatalog::new(Arc::new(repo))
            .manufacturers()
            .await
            .expect("listed");
        assert_eq!(manufacturers.len(), 2);
    }
}
