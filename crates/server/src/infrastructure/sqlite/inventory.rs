//! sqlx repository for per-pharmacy inventory rows.

use async_trait::async_trait;
use pharmstock_domain::{
    InventoryItem, InventoryItemId, MedicineId, PharmacyId, LOW_STOCK_THRESHOLD,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::medicine;
use super::row::{bad_column, fmt_ts, parse_ts};
use crate::infrastructure::ports::{InventoryRepo, RepoError, StockCounts, StockedMedicine};

const COLUMNS: &str = "id, pharmacy_id, medicine_id, stock, price_cents, created_at, updated_at";

pub struct SqliteInventoryRepo {
    pool: SqlitePool,
}

impl SqliteInventoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<InventoryItem, RepoError> {
    item_from_row(row, "id")
}

fn item_from_row(row: &SqliteRow, id_column: &str) -> Result<InventoryItem, RepoError> {
    let id: String = row.try_get(id_column)?;
    let pharmacy_id: String = row.try_get("pharmacy_id")?;
    let medicine_id: String = row.try_get("medicine_id")?;
    let created_at: String = row.try_get("item_created_at").or_else(|_| row.try_get("created_at"))?;
    let updated_at: String = row.try_get("updated_at")?;
    Ok(InventoryItem {
        id: InventoryItemId::parse(&id).map_err(|e| bad_column("id", e))?,
        pharmacy_id: PharmacyId::parse(&pharmacy_id).map_err(|e| bad_column("pharmacy_id", e))?,
        medicine_id: MedicineId::parse(&medicine_id).map_err(|e| bad_column("medicine_id", e))?,
        quantity: row.try_get("stock")?,
        price_cents: row.try_get("price_cents")?,
        created_at: parse_ts("created_at", &created_at)?,
        updated_at: parse_ts("updated_at", &updated_at)?,
    })
}

#[async_trait]
impl InventoryRepo for SqliteInventoryRepo {
    async fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM pharmacy_inventory WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn get_for_medicine(
        &self,
        pharmacy_id: PharmacyId,
        medicine_id: MedicineId,
    ) -> Result<Option<InventoryItem>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM pharmacy_inventory WHERE pharmacy_id = ? AND medicine_id = ?"
        ))
        .bind(pharmacy_id.to_string())
        .bind(medicine_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn save(&self, item: &InventoryItem) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO pharmacy_inventory
                (id, pharmacy_id, medicine_id, stock, price_cents, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                stock = excluded.stock,
                price_cents = excluded.price_cents,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(item.id.to_string())
        .bind(item.pharmacy_id.to_string())
        .bind(item.medicine_id.to_string())
        .bind(item.quantity)
        .bind(item.price_cents)
        .bind(fmt_ts(item.created_at))
        .bind(fmt_ts(item.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: InventoryItemId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM pharmacy_inventory WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list_for_pharmacy(
        &self,
        pharmacy_id: PharmacyId,
    ) -> Result<Vec<StockedMedicine>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.pharmacy_id, i.medicine_id, i.stock, i.price_cents,
                   i.created_at AS item_created_at, i.updated_at,
                   m.id AS m_id, m.reg_no, m.generic_name, m.brand_name, m.dosage,
                   m.pack_size, m.pack_type, m.manufacturer, m.country, m.agent, m.reg_date,
                   m.schedule, m.validation, m.dossier_no, m.status,
                   m.created_at AS created_at
            FROM pharmacy_inventory i
            JOIN medicine_master m ON m.id = i.medicine_id
            WHERE i.pharmacy_id = ?
            ORDER BY i.updated_at DESC, i.id
            "#,
        )
        .bind(pharmacy_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(StockedMedicine {
                    item: item_from_row(row, "id")?,
                    medicine: medicine::from_joined_row(row)?,
                })
            })
            .collect()
    }

    async fn stock_counts(&self) -> Result<StockCounts, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN stock > ? THEN 1 ELSE 0 END), 0) AS in_stock,
                COALESCE(SUM(CASE WHEN stock > 0 AND stock <= ? THEN 1 ELSE 0 END), 0) AS low_stock,
                COALESCE(SUM(CASE WHEN stock = 0 THEN 1 ELSE 0 END), 0) AS out_of_stock
            FROM pharmacy_inventory
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        let in_stock: i64 = row.try_get("in_stock")?;
        let low_stock: i64 = row.try_get("low_stock")?;
        let out_of_stock: i64 = row.try_get("out_of_stock")?;
        Ok(StockCounts {
            in_stock: in_stock as u64,
            low_stock: low_stock as u64,
            out_of_stock: out_of_stock as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MedicineRepo;
    use crate::infrastructure::sqlite::{test_pool, SqliteMedicineRepo};
    use chrono::Utc;
    use pharmstock_domain::Medicine;

    async fn seed_medicine(pool: &SqlitePool, reg_no: &str) -> Medicine {
        let mut m = Medicine::new(reg_no, Utc::now()).expect("valid");
        m.generic_name = Some("Paracetamol".into());
        SqliteMedicineRepo::new(pool.clone())
            .save(&m)
            .await
            .expect("seed");
        m
    }

    #[tokio::test]
    async fn save_get_and_unique_pair_lookup() {
        let pool = test_pool().await;
        let repo = SqliteInventoryRepo::new(pool.clone());
        let medicine = seed_medicine(&pool, "R1").await;
        let pharmacy_id = PharmacyId::new();

        let item =
            InventoryItem::new(pharmacy_id, medicine.id, 40, 1250, Utc::now()).expect("valid");
        repo.save(&item).await.expect("save");

        let loaded = repo.get(item.id).await.expect("get").expect("present");
        assert_eq!(loaded, item);
        let by_pair = repo
            .get_for_medicine(pharmacy_id, medicine.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(by_pair.id, item.id);
    }

    #[tokio::test]
    async fn list_joins_medicine_details_newest_first() {
        let pool = test_pool().await;
        let repo = SqliteInventoryRepo::new(pool.clone());
        let m1 = seed_medicine(&pool, "R1").await;
        let m2 = seed_medicine(&pool, "R2").await;
        let pharmacy_id = PharmacyId::new();

        let t0 = Utc::now();
        let older = InventoryItem::new(pharmacy_id, m1.id, 5, 100, t0).expect("valid");
        let newer = InventoryItem::new(
            pharmacy_id,
            m2.id,
            7,
            200,
            t0 + chrono::Duration::seconds(10),
        )
        .expect("valid");
        repo.save(&older).await.expect("save");
        repo.save(&newer).await.expect("save");

        let rows = repo.list_for_pharmacy(pharmacy_id).await.expect("list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item.id, newer.id);
        assert_eq!(rows[0].medicine.reg_no, "R2");
        assert_eq!(rows[1].medicine.generic_name.as_deref(), Some("Paracetamol"));
    }

    #[tokio::test]
    async fn stock_counts_slice_by_threshold() {
        let pool = test_pool().await;
        let repo = SqliteInventoryRepo::new(pool.clone());
        let pharmacy_id = PharmacyId::new();
        for (reg_no, stock) in [("R1", 50), ("R2", 3), ("R3", 0)] {
            let m = seed_medicine(&pool, reg_no).await;
            let item =
                InventoryItem::new(pharmacy_id, m.id, stock, 100, Utc::now()).expect("valid");
            repo.save(&item).await.expect("save");
        }

        let counts = repo.stock_counts().await.expect("counts");
        assert_eq!(
            counts,
            StockCounts {
                in_stock: 1,
                low_stock: 1,
                out_of_stock: 1
            }
        );
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = SqliteInventoryRepo::new(test_pool().await);
        assert!(matches!(
            repo.delete(InventoryItemId::new()).await,
            Err(RepoError::NotFound)
        ));
    }
}
