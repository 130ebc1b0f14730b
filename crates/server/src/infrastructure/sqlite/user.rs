//! sqlx repository for login identities.

use std::str::FromStr;

use async_trait::async_trait;
use pharmstock_domain::{PharmacyId, Role, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::row::bad_column;
use crate::infrastructure::ports::{RepoError, UserRepo};

const COLUMNS: &str = "id, username, password_hash, role, pharmacy_id, enabled";

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<User, RepoError> {
    let id: String = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let pharmacy_id: Option<String> = row.try_get("pharmacy_id")?;
    Ok(User {
        id: UserId::parse(&id).map_err(|e| bad_column("id", e))?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role: Role::from_str(&role).map_err(|e| bad_column("role", e))?,
        pharmacy_id: pharmacy_id
            .map(|p| PharmacyId::parse(&p).map_err(|e| bad_column("pharmacy_id", e)))
            .transpose()?,
        enabled: row.try_get("enabled")?,
    })
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM app_user WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM app_user WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO app_user (id, username, password_hash, role, pharmacy_id, enabled)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                username = excluded.username,
                password_hash = excluded.password_hash,
                enabled = excluded.enabled
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(user.pharmacy_id.map(|p| p.to_string()))
        .bind(user.enabled)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
