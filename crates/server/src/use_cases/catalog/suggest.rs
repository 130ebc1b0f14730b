//! Typeahead over the catalog for the inventory "add medicine" box.

use std::sync::Arc;

use pharmstock_domain::Medicine;

use super::error::CatalogError;
use crate::infrastructure::ports::MedicineRepo;

const MIN_PREFIX_LEN: usize = 2;
const SUGGESTION_LIMIT: u32 = 10;

pub struct SuggestMedicines {
    medicine_repo: Arc<dyn MedicineRepo>,
}

impl SuggestMedicines {
    pub fn new(medicine_repo: Arc<dyn MedicineRepo>) -> Self {
        Self { medicine_repo }
    }

    pub async fn execute(&self, query: &str) -> Result<Vec<Medicine>, CatalogError> {
        let prefix = query.trim();
        if prefix.chars().count() < MIN_PREFIX_LEN {
            return Ok(Vec::new());
        }
        Ok(self.medicine_repo.suggest(prefix, SUGGESTION_LIMIT).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockMedicineRepo;
    use chrono::Utc;
    use mockall::predicate::*;

    #[tokio::test]
    async fn short_queries_return_nothing_without_hitting_the_repo() {
        let repo = MockMedicineRepo::new();
        let suggestions = SuggestMedicines::new(Arc::new(repo))
            .execute(" p ")
            .await
            .expect("suggested");
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn trims_and_forwards_the_prefix() {
        let mut repo = MockMedicineRepo::new();
        repo.expect_suggest()
            .with(eq("pa"), eq(SUGGESTION_LIMIT))
            .returning(|_, _| {
                Ok(vec![
                    Medicine::new("19/07/1234", Utc::now()).expect("valid fixture")
                ])
            });

        let suggestions = SuggestMedicines::new(Arc::new(repo))
            .execute("  pa ")
            .await
            .expect("suggested");
        assert_eq!(suggestions.len(), 1);
    }
}
