//! sqlx repository for password setup and reset tokens.

use std::str::FromStr;

use async_trait::async_trait;
use pharmstock_domain::{SetupToken, SetupTokenId, TokenPurpose, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::row::{bad_column, fmt_ts, parse_ts, parse_ts_opt};
use crate::infrastructure::ports::{RepoError, TokenRepo};

pub struct SqliteTokenRepo {
    pool: SqlitePool,
}

impl SqliteTokenRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<SetupToken, RepoError> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let purpose: String = row.try_get("purpose")?;
    let expires_at: String = row.try_get("expires_at")?;
    let used_at: Option<String> = row.try_get("used_at")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(SetupToken {
        id: SetupTokenId::parse(&id).map_err(|e| bad_column("id", e))?,
        user_id: UserId::parse(&user_id).map_err(|e| bad_column("user_id", e))?,
        token_hash: row.try_get("token_hash")?,
        purpose: TokenPurpose::from_str(&purpose).map_err(|e| bad_column("purpose", e))?,
        expires_at: parse_ts("expires_at", &expires_at)?,
        used_at: parse_ts_opt("used_at", used_at.as_deref())?,
        created_at: parse_ts("created_at", &created_at)?,
    })
}

#[async_trait]
impl TokenRepo for SqliteTokenRepo {
    async fn save(&self, token: &SetupToken) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO password_setup_token
                (id, user_id, token_hash, purpose, expires_at, used_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET used_at = excluded.used_at
            "#,
        )
        .bind(token.id.to_string())
        .bind(token.user_id.to_string())
        .bind(&token.token_hash)
        .bind(token.purpose.to_string())
        .bind(fmt_ts(token.expires_at))
        .bind(token.used_at.map(fmt_ts))
        .bind(fmt_ts(token.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_hash(&self, token_hash: &str) -> Result<Option<SetupToken>, RepoError> {
        let row = sqlx::query(
            "SELECT id, user_id, token_hash, purpose, expires_at, used_at, created_at \
             FROM password_setup_token WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(from_row).transpose()
    }
}
