//! sqlx repository for the append-only inventory activity log.

use std::str::FromStr;

use async_trait::async_trait;
use pharmstock_domain::{ActivityAction, ActivityId, InventoryActivity, MedicineId, PharmacyId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::row::{bad_column, fmt_ts, parse_ts};
use crate::infrastructure::ports::{ActivityRepo, RepoError};

pub struct SqliteActivityRepo {
    pool: SqlitePool,
}

impl SqliteActivityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<InventoryActivity, RepoError> {
    let id: String = row.try_get("id")?;
    let pharmacy_id: String = row.try_get("pharmacy_id")?;
    let medicine_id: Option<String> = row.try_get("medicine_id")?;
    let action: String = row.try_get("action")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(InventoryActivity {
        id: ActivityId::parse(&id).map_err(|e| bad_column("id", e))?,
        pharmacy_id: PharmacyId::parse(&pharmacy_id).map_err(|e| bad_column("pharmacy_id", e))?,
        medicine_id: medicine_id
            .map(|m| MedicineId::parse(&m).map_err(|e| bad_column("medicine_id", e)))
            .transpose()?,
        action: ActivityAction::from_str(&action).map_err(|e| bad_column("action", e))?,
        message: row.try_get("message")?,
        occurred_at: parse_ts("created_at", &created_at)?,
    })
}

#[async_trait]
impl ActivityRepo for SqliteActivityRepo {
    async fn append(&self, activity: &InventoryActivity) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO inventory_activity (id, pharmacy_id, medicine_id, action, message, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(activity.id.to_string())
        .bind(activity.pharmacy_id.to_string())
        .bind(activity.medicine_id.map(|m| m.to_string()))
        .bind(activity.action.to_string())
        .bind(&activity.message)
        .bind(fmt_ts(activity.occurred_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest_for_pharmacy(
        &self,
        pharmacy_id: PharmacyId,
        limit: u32,
    ) -> Result<Vec<InventoryActivity>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, pharmacy_id, medicine_id, action, message, created_at FROM inventory_activity \
             WHERE pharmacy_id = ? ORDER BY created_at DESC, id LIMIT ?",
        )
        .bind(pharmacy_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(from_row).collect()
    }
}
