//! SQLite persistence: connection setup, schema bootstrap and the sqlx
//! repository implementations behind the port traits.

mod activity;
mod inventory;
mod location;
mod medicine;
mod pharmacy;
mod row;
mod token;
mod user;

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub use activity::SqliteActivityRepo;
pub use inventory::SqliteInventoryRepo;
pub use location::SqliteLocationRepo;
pub use medicine::SqliteMedicineRepo;
pub use pharmacy::SqlitePharmacyRepo;
pub use token::SqliteTokenRepo;
pub use user::SqliteUserRepo;

use super::ports::{
    ActivityRepo, InventoryRepo, LocationRepo, MedicineRepo, PharmacyRepo, TokenRepo, UserRepo,
};

/// Open (creating if needed) the SQLite database at `path`.
pub async fn connect(path: &str) -> Result<SqlitePool, sqlx::Error> {
    let options: SqliteConnectOptions = path.parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create all tables and indexes when they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medicine_master (
            id TEXT PRIMARY KEY,
            reg_no TEXT NOT NULL UNIQUE,
            generic_name TEXT,
            brand_name TEXT,
            dosage TEXT,
            pack_size TEXT,
            pack_type TEXT,
            manufacturer TEXT,
            country TEXT,
            agent TEXT,
            reg_date TEXT,
            schedule TEXT,
            validation TEXT,
            dossier_no TEXT,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_medicine_generic ON medicine_master (generic_name)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_medicine_brand ON medicine_master (brand_name)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pharmacy (
            id TEXT PRIMARY KEY,
            legal_entity_name TEXT NOT NULL,
            trade_name TEXT,
            nmra_license TEXT NOT NULL UNIQUE,
            business_reg_no TEXT NOT NULL,
            address TEXT NOT NULL,
            telephone TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            entity_type TEXT NOT NULL,
            contact_full_name TEXT NOT NULL,
            contact_title TEXT NOT NULL,
            contact_phone TEXT NOT NULL,
            contact_email TEXT NOT NULL,
            declaration_date TEXT NOT NULL,
            agreed_to_declaration INTEGER NOT NULL,
            about TEXT,
            opening_hours_json TEXT,
            status TEXT NOT NULL,
            rejection_reason TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_user (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            role TEXT NOT NULL,
            pharmacy_id TEXT REFERENCES pharmacy(id),
            enabled INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pharmacy_inventory (
            id TEXT PRIMARY KEY,
            pharmacy_id TEXT NOT NULL REFERENCES pharmacy(id),
            medicine_id TEXT NOT NULL REFERENCES medicine_master(id),
            stock INTEGER NOT NULL,
            price_cents INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (pharmacy_id, medicine_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_activity (
            id TEXT PRIMARY KEY,
            pharmacy_id TEXT NOT NULL REFERENCES pharmacy(id),
            medicine_id TEXT,
            action TEXT NOT NULL,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_activity_pharmacy ON inventory_activity (pharmacy_id, created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS password_setup_token (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES app_user(id),
            token_hash TEXT NOT NULL UNIQUE,
            purpose TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            used_at TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pharmacy_location (
            id TEXT PRIMARY KEY,
            pharmacy_id TEXT NOT NULL UNIQUE REFERENCES pharmacy(id),
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// All sqlx repositories over one pool, ready to hand to `App::new`.
pub struct SqliteRepositories {
    pub medicine: Arc<dyn MedicineRepo>,
    pub pharmacy: Arc<dyn PharmacyRepo>,
    pub user: Arc<dyn UserRepo>,
    pub inventory: Arc<dyn InventoryRepo>,
    pub activity: Arc<dyn ActivityRepo>,
    pub token: Arc<dyn TokenRepo>,
    pub location: Arc<dyn LocationRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            medicine: Arc::new(SqliteMedicineRepo::new(pool.clone())),
            pharmacy: Arc::new(SqlitePharmacyRepo::new(pool.clone())),
            user: Arc::new(SqliteUserRepo::new(pool.clone())),
            inventory: Arc::new(SqliteInventoryRepo::new(pool.clone())),
            activity: Arc::new(SqliteActivityRepo::new(pool.clone())),
            token: Arc::new(SqliteTokenRepo::new(pool.clone())),
            location: Arc::new(SqliteLocationRepo::new(pool)),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = "sqlite::memory:"
        .parse::<SqliteConnectOptions>()
        .expect("in-memory sqlite options")
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory sqlite");
    ensure_schema(&pool).await.expect("schema");
    pool
}
