//! sqlx repository for pharmacy locations (one row per pharmacy).

use async_trait::async_trait;
use pharmstock_domain::{PharmacyId, PharmacyLocation, PharmacyLocationId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::row::bad_column;
use crate::infrastructure::ports::{LocationRepo, RepoError};

pub struct SqliteLocationRepo {
    pool: SqlitePool,
}

impl SqliteLocationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<PharmacyLocation, RepoError> {
    let id: String = row.try_get("id")?;
    let pharmacy_id: String = row.try_get("pharmacy_id")?;
    Ok(PharmacyLocation {
        id: PharmacyLocationId::parse(&id).map_err(|e| bad_column("id", e))?,
        pharmacy_id: PharmacyId::parse(&pharmacy_id).map_err(|e| bad_column("pharmacy_id", e))?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

#[async_trait]
impl LocationRepo for SqliteLocationRepo {
    async fn get_for_pharmacy(
        &self,
        pharmacy_id: PharmacyId,
    ) -> Result<Option<PharmacyLocation>, RepoError> {
        let row = sqlx::query(
            "SELECT id, pharmacy_id, latitude, longitude FROM pharmacy_location \
             WHERE pharmacy_id = ?",
        )
        .bind(pharmacy_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn upsert(&self, location: &PharmacyLocation) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO pharmacy_location (id, pharmacy_id, latitude, longitude)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (pharmacy_id) DO UPDATE SET
                latitude = excluded.latitude,
                longitude = excluded.longitude
            "#,
        )
        .bind(location.id.to_string())
        .bind(location.pharmacy_id.to_string())
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
