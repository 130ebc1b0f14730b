//! sqlx repository for the medicine master catalog.

use std::str::FromStr;

use async_trait::async_trait;
use pharmstock_domain::{CatalogStatus, Medicine, MedicineId};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::row::{bad_column, fmt_date, fmt_ts, parse_date_opt, parse_ts};
use crate::infrastructure::ports::{
    MedicineFilter, MedicineRepo, MedicineSort, Page, Paged, RepoError,
};

const COLUMNS: &str = "id, reg_no, generic_name, brand_name, dosage, pack_size, pack_type, \
                       manufacturer, country, agent, reg_date, schedule, validation, dossier_no, \
                       status, created_at";

pub struct SqliteMedicineRepo {
    pool: SqlitePool,
}

impl SqliteMedicineRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<Medicine, RepoError> {
    from_row_with_id(row, "id")
}

/// For joined selects where the medicine id is aliased to `m_id`.
pub(super) fn from_joined_row(row: &SqliteRow) -> Result<Medicine, RepoError> {
    from_row_with_id(row, "m_id")
}

fn from_row_with_id(row: &SqliteRow, id_column: &str) -> Result<Medicine, RepoError> {
    let id: String = row.try_get(id_column)?;
    let status: String = row.try_get("status")?;
    let reg_date: Option<String> = row.try_get("reg_date")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(Medicine {
        id: MedicineId::parse(&id).map_err(|e| bad_column("id", e))?,
        reg_no: row.try_get("reg_no")?,
        generic_name: row.try_get("generic_name")?,
        brand_name: row.try_get("brand_name")?,
        dosage: row.try_get("dosage")?,
        pack_size: row.try_get("pack_size")?,
        pack_type: row.try_get("pack_type")?,
        manufacturer: row.try_get("manufacturer")?,
        country: row.try_get("country")?,
        agent: row.try_get("agent")?,
        reg_date: parse_date_opt("reg_date", reg_date.as_deref())?,
        schedule: row.try_get("schedule")?,
        validation: row.try_get("validation")?,
        dossier_no: row.try_get("dossier_no")?,
        status: CatalogStatus::from_str(&status).map_err(|e| bad_column("status", e))?,
        created_at: parse_ts("created_at", &created_at)?,
    })
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &MedicineFilter) {
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q.to_lowercase());
        qb.push(" AND (LOWER(COALESCE(generic_name, '')) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(COALESCE(brand_name, '')) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(reg_no) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(m) = filter.manufacturer.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        qb.push(" AND LOWER(COALESCE(manufacturer, '')) = ")
            .push_bind(m.to_lowercase());
    }
    if let Some(c) = filter.country.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND LOWER(COALESCE(country, '')) = ")
            .push_bind(c.to_lowercase());
    }
    if let Some(b) = filter.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        qb.push(" AND LOWER(COALESCE(brand_name, '')) = ")
            .push_bind(b.to_lowercase());
    }
}

#[async_trait]
impl MedicineRepo for SqliteMedicineRepo {
    async fn get(&self, id: MedicineId) -> Result<Option<Medicine>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medicine_master WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn get_by_reg_no(&self, reg_no: &str) -> Result<Option<Medicine>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medicine_master WHERE reg_no = ?"
        ))
        .bind(reg_no)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn save(&self, medicine: &Medicine) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO medicine_master
                (id, reg_no, generic_name, brand_name, dosage, pack_size, pack_type,
                 manufacturer, country, agent, reg_date, schedule, validation, dossier_no,
                 status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                reg_no = excluded.reg_no,
                generic_name = excluded.generic_name,
                brand_name = excluded.brand_name,
                dosage = excluded.dosage,
                pack_size = excluded.pack_size,
                pack_type = excluded.pack_type,
                manufacturer = excluded.manufacturer,
                country = excluded.country,
                agent = excluded.agent,
                reg_date = excluded.reg_date,
                schedule = excluded.schedule,
                validation = excluded.validation,
                dossier_no = excluded.dossier_no,
                status = excluded.status
            "#,
        )
        .bind(medicine.id.to_string())
        .bind(&medicine.reg_no)
        .bind(&medicine.generic_name)
        .bind(&medicine.brand_name)
        .bind(&medicine.dosage)
        .bind(&medicine.pack_size)
        .bind(&medicine.pack_type)
        .bind(&medicine.manufacturer)
        .bind(&medicine.country)
        .bind(&medicine.agent)
        .bind(medicine.reg_date.map(fmt_date))
        .bind(&medicine.schedule)
        .bind(&medicine.validation)
        .bind(&medicine.dossier_no)
        .bind(medicine.status.to_string())
        .bind(fmt_ts(medicine.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: MedicineId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM medicine_master WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Medicine>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medicine_master ORDER BY generic_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(from_row).collect()
    }

    async fn search(
        &self,
        filter: &MedicineFilter,
        sort: MedicineSort,
        page: Page,
    ) -> Result<Paged<Medicine>, RepoError> {
        let mut count_qb =
            QueryBuilder::new("SELECT COUNT(*) FROM medicine_master WHERE 1 = 1");
        push_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM medicine_master WHERE 1 = 1"
        ));
        push_filter(&mut qb, filter);
        // Column comes from a whitelist enum, never from the request.
        qb.push(format!(
            " ORDER BY {} COLLATE NOCASE {}, id ASC",
            sort.field.column(),
            if sort.ascending { "ASC" } else { "DESC" }
        ));
        qb.push(" LIMIT ")
            .push_bind(page.size as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let items = rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(Paged {
            items,
            total: total as u64,
            page: page.page,
            size: page.size,
        })
    }

    async fn suggest(&self, prefix: &str, limit: u32) -> Result<Vec<Medicine>, RepoError> {
        let pattern = format!("{}%", prefix.to_lowercase());
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medicine_master \
             WHERE LOWER(COALESCE(generic_name, '')) LIKE ? \
                OR LOWER(COALESCE(brand_name, '')) LIKE ? \
             ORDER BY generic_name COLLATE NOCASE, id LIMIT ?"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(from_row).collect()
    }

    async fn distinct_manufacturers(&self) -> Result<Vec<String>, RepoError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT manufacturer FROM medicine_master \
             WHERE manufacturer IS NOT NULL AND manufacturer != '' \
             ORDER BY manufacturer COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(m,)| m).collect())
    }

    async fn distinct_brands(&self) -> Result<Vec<String>, RepoError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT brand_name FROM medicine_master \
             WHERE brand_name IS NOT NULL AND brand_name != '' \
             ORDER BY brand_name COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(b,)| b).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicine_master")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn insert_batch(&self, medicines: &[Medicine]) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        for medicine in medicines {
            sqlx::query(
                r#"
                INSERT INTO medicine_master
                    (id, reg_no, generic_name, brand_name, dosage, pack_size, pack_type,
                     manufacturer, country, agent, reg_date, schedule, validation, dossier_no,
                     status, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(medicine.id.to_string())
            .bind(&medicine.reg_no)
            .bind(&medicine.generic_name)
            .bind(&medicine.brand_name)
            .bind(&medicine.dosage)
            .bind(&medicine.pack_size)
            .bind(&medicine.pack_type)
            .bind(&medicine.manufacturer)
            .bind(&medicine.country)
            .bind(&medicine.agent)
            .bind(medicine.reg_date.map(fmt_date))
            .bind(&medicine.schedule)
            .bind(&medicine.validation)
            .bind(&medicine.dossier_no)
            .bind(medicine.status.to_string())
            .bind(fmt_ts(medicine.created_at))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::test_pool;
    use chrono::Utc;

    fn med(reg_no: &str, generic: &str, brand: &str, manufacturer: &str) -> Medicine {
        let mut m = Medicine::new(reg_no, Utc::now()).expect("valid");
        m.generic_name = Some(generic.to_string());
        m.brand_name = Some(brand.to_string());
        m.manufacturer = Some(manufacturer.to_string());
        m
    }

    #[tokio::test]
    async fn save_and_round_trip() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        let m = med("19/07/0001", "Paracetamol", "Panadol", "GSK");
        repo.save(&m).await.expect("save");

        let loaded = repo.get(m.id).await.expect("get").expect("present");
        assert_eq!(loaded, m);
        let by_reg = repo
            .get_by_reg_no("19/07/0001")
            .await
            .expect("get")
            .expect("present");
        assert_eq!(by_reg.id, m.id);
    }

    #[tokio::test]
    async fn save_updates_existing_row() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        let mut m = med("19/07/0001", "Paracetamol", "Panadol", "GSK");
        repo.save(&m).await.expect("save");

        m.dosage = Some("500mg".into());
        repo.save(&m).await.expect("update");
        let loaded = repo.get(m.id).await.expect("get").expect("present");
        assert_eq!(loaded.dosage.as_deref(), Some("500mg"));
        assert_eq!(repo.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn suggest_matches_generic_or_brand_prefix() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        repo.save(&med("R1", "Paracetamol", "Panadol", "GSK"))
            .await
            .expect("save");
        repo.save(&med("R2", "Ibuprofen", "Brufen", "Abbott"))
            .await
            .expect("save");

        let hits = repo.suggest("pa", 10).await.expect("suggest");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reg_no, "R1");

        let hits = repo.suggest("bru", 10).await.expect("suggest");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reg_no, "R2");
    }

    #[tokio::test]
    async fn search_filters_and_pages() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        repo.save(&med("R1", "Paracetamol", "Panadol", "GSK"))
            .await
            .expect("save");
        repo.save(&med("R2", "Paracetamol", "Calpol", "GSK"))
            .await
            .expect("save");
        repo.save(&med("R3", "Ibuprofen", "Brufen", "Abbott"))
            .await
            .expect("save");

        let filter = MedicineFilter {
            q: Some("paracet".into()),
            ..Default::default()
        };
        let page = repo
            .search(&filter, MedicineSort::default(), Page::new(Some(0), Some(1)))
            .await
            .expect("search");
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages(), 2);

        let filter = MedicineFilter {
            manufacturer: Some("abbott".into()),
            ..Default::default()
        };
        let page = repo
            .search(&filter, MedicineSort::default(), Page::new(None, None))
            .await
            .expect("search");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].reg_no, "R3");
    }

    #[tokio::test]
    async fn search_sort_descends_when_asked() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        repo.save(&med("R1", "Amoxicillin", "Amoxil", "GSK"))
            .await
            .expect("save");
        repo.save(&med("R2", "Zinc Sulphate", "Zincovit", "Apex"))
            .await
            .expect("save");

        let sort = MedicineSort::parse("generic_name,desc").expect("sort");
        let page = repo
            .search(&MedicineFilter::default(), sort, Page::new(None, None))
            .await
            .expect("search");
        assert_eq!(page.items[0].reg_no, "R2");
    }

    #[tokio::test]
    async fn distinct_lists_skip_blanks() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        repo.save(&med("R1", "A", "BrandA", "GSK")).await.expect("save");
        let mut blank = Medicine::new("R2", Utc::now()).expect("valid");
        blank.manufacturer = Some(String::new());
        repo.save(&blank).await.expect("save");

        assert_eq!(
            repo.distinct_manufacturers().await.expect("list"),
            vec!["GSK".to_string()]
        );
        assert_eq!(
            repo.distinct_brands().await.expect("list"),
            vec!["BrandA".to_string()]
        );
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        assert!(matches!(
            repo.delete(MedicineId::new()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn insert_batch_writes_all_rows() {
        let repo = SqliteMedicineRepo::new(test_pool().await);
        let batch: Vec<Medicine> = (0..3)
            .map(|i| med(&format!("R{i}"), "Generic", "Brand", "M"))
            .collect();
        repo.insert_batch(&batch).await.expect("batch");
        assert_eq!(repo.count().await.expect("count"), 3);
    }
}
