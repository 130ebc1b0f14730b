//! sqlx repository for pharmacy applications.

use std::str::FromStr;

use async_trait::async_trait;
use pharmstock_domain::{Pharmacy, PharmacyId, PharmacyStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::row::{bad_column, fmt_date, fmt_ts, parse_date, parse_ts};
use crate::infrastructure::ports::{Page, Paged, PharmacyFilter, PharmacyRepo, RepoError};

const COLUMNS: &str = "id, legal_entity_name, trade_name, nmra_license, business_reg_no, address, \
                       telephone, email, entity_type, contact_full_name, contact_title, \
                       contact_phone, contact_email, declaration_date, agreed_to_declaration, \
                       about, opening_hours_json, status, rejection_reason, created_at";

pub struct SqlitePharmacyRepo {
    pool: SqlitePool,
}

impl SqlitePharmacyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_row(row: &SqliteRow) -> Result<Pharmacy, RepoError> {
    let id: String = row.try_get("id")?;
    let declaration_date: String = row.try_get("declaration_date")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(Pharmacy {
        id: PharmacyId::parse(&id).map_err(|e| bad_column("id", e))?,
        legal_entity_name: row.try_get("legal_entity_name")?,
        trade_name: row.try_get("trade_name")?,
        nmra_license: row.try_get("nmra_license")?,
        business_reg_no: row.try_get("business_reg_no")?,
        address: row.try_get("address")?,
        telephone: row.try_get("telephone")?,
        email: row.try_get("email")?,
        entity_type: row.try_get("entity_type")?,
        contact_full_name: row.try_get("contact_full_name")?,
        contact_title: row.try_get("contact_title")?,
        contact_phone: row.try_get("contact_phone")?,
        contact_email: row.try_get("contact_email")?,
        declaration_date: parse_date("declaration_date", &declaration_date)?,
        agreed_to_declaration: row.try_get("agreed_to_declaration")?,
        about: row.try_get("about")?,
        opening_hours_json: row.try_get("opening_hours_json")?,
        status: PharmacyStatus::from_str(&status).map_err(|e| bad_column("status", e))?,
        rejection_reason: row.try_get("rejection_reason")?,
        created_at: parse_ts("created_at", &created_at)?,
    })
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PharmacyFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        qb.push(" AND LOWER(legal_entity_name) LIKE ")
            .push_bind(format!("%{}%", q.to_lowercase()));
    }
}

#[async_trait]
impl PharmacyRepo for SqlitePharmacyRepo {
    async fn get(&self, id: PharmacyId) -> Result<Option<Pharmacy>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM pharmacy WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(from_row).transpose()
    }

    async fn save(&self, pharmacy: &Pharmacy) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO pharmacy
                (id, legal_entity_name, trade_name, nmra_license, business_reg_no, address,
                 telephone, email, entity_type, contact_full_name, contact_title, contact_phone,
                 contact_email, declaration_date, agreed_to_declaration, about,
                 opening_hours_json, status, rejection_reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                legal_entity_name = excluded.legal_entity_name,
                trade_name = excluded.trade_name,
                telephone = excluded.telephone,
                contact_full_name = excluded.contact_full_name,
                contact_title = excluded.contact_title,
                contact_phone = excluded.contact_phone,
                contact_email = excluded.contact_email,
                about = excluded.about,
                opening_hours_json = excluded.opening_hours_json,
                status = excluded.status,
                rejection_reason = excluded.rejection_reason
            "#,
        )
        .bind(pharmacy.id.to_string())
        .bind(&pharmacy.legal_entity_name)
        .bind(&pharmacy.trade_name)
        .bind(&pharmacy.nmra_license)
        .bind(&pharmacy.business_reg_no)
        .bind(&pharmacy.address)
        .bind(&pharmacy.telephone)
        .bind(&pharmacy.email)
        .bind(&pharmacy.entity_type)
        .bind(&pharmacy.contact_full_name)
        .bind(&pharmacy.contact_title)
        .bind(&pharmacy.contact_phone)
        .bind(&pharmacy.contact_email)
        .bind(fmt_date(pharmacy.declaration_date))
        .bind(pharmacy.agreed_to_declaration)
        .bind(&pharmacy.about)
        .bind(&pharmacy.opening_hours_json)
        .bind(pharmacy.status.to_string())
        .bind(&pharmacy.rejection_reason)
        .bind(fmt_ts(pharmacy.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn exists_nmra_license(&self, license: &str) -> Result<bool, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pharmacy WHERE nmra_license = ?")
                .bind(license)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn exists_email(&self, email: &str) -> Result<bool, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pharmacy WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn list(
        &self,
        filter: &PharmacyFilter,
        page: Page,
    ) -> Result<Paged<Pharmacy>, RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM pharmacy WHERE 1 = 1");
        push_filter(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM pharmacy WHERE 1 = 1"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id ASC LIMIT ")
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

    async fn count_approved(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pharmacy WHERE status = ?")
            .bind(PharmacyStatus::Approved.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_pending(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pharmacy WHERE status = ?")
            .bind(PharmacyStatus::Pending.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn list_with_inventory(&self) -> Result<Vec<Pharmacy>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM pharmacy \
             WHERE id IN (SELECT DISTINCT pharmacy_id FROM pharmacy_inventory) \
             ORDER BY legal_entity_name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::test_pool;
    use chrono::{NaiveDate, Utc};
    use pharmstock_domain::PharmacyRegistration;

    fn registration(name: &str, license: &str, email: &str) -> PharmacyRegistration {
        PharmacyRegistration {
            legal_entity_name: name.into(),
            trade_name: None,
            nmra_license: license.into(),
            business_reg_no: "BR-1".into(),
            address: "1 Main St".into(),
            telephone: "+94110000000".into(),
            email: email.into(),
            entity_type: "Sole Proprietor".into(),
            contact_full_name: "A. Person".into(),
            contact_title: "Owner".into(),
            contact_phone: "+94770000000".into(),
            contact_email: email.into(),
            declaration_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("date"),
            agreed_to_declaration: true,
        }
    }

    fn pharmacy(name: &str, license: &str, email: &str) -> Pharmacy {
        Pharmacy::register(registration(name, license, email), Utc::now()).expect("valid")
    }

    #[tokio::test]
    async fn save_and_round_trip() {
        let repo = SqlitePharmacyRepo::new(test_pool().await);
        let p = pharmacy("Acme Pharma", "NMRA-1", "a@acme.lk");
        repo.save(&p).await.expect("save");
        let loaded = repo.get(p.id).await.expect("get").expect("present");
        assert_eq!(loaded, p);
    }

    #[tokio::test]
    async fn uniqueness_probes_see_saved_rows() {
        let repo = SqlitePharmacyRepo::new(test_pool().await);
        repo.save(&pharmacy("Acme", "NMRA-1", "a@acme.lk"))
            .await
            .expect("save");
        assert!(repo.exists_nmra_license("NMRA-1").await.expect("probe"));
        assert!(!repo.exists_nmra_license("NMRA-2").await.expect("probe"));
        assert!(repo.exists_email("a@acme.lk").await.expect("probe"));
    }

    #[tokio::test]
    async fn list_filters_by_status_and_name() {
        let repo = SqlitePharmacyRepo::new(test_pool().await);
        let mut approved = pharmacy("Green Cross", "NMRA-1", "g@x.lk");
        approved.approve().expect("approve");
        repo.save(&approved).await.expect("save");
        repo.save(&pharmacy("City Meds", "NMRA-2", "c@x.lk"))
            .await
            .expect("save");

        let page = repo
            .list(
                &PharmacyFilter {
                    status: Some(PharmacyStatus::Pending),
                    q: None,
                },
                Page::new(None, None),
            )
            .await
            .expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].legal_entity_name, "City Meds");

        let page = repo
            .list(
                &PharmacyFilter {
                    status: None,
                    q: Some("cross".into()),
                },
                Page::new(None, None),
            )
            .await
            .expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].legal_entity_name, "Green Cross");
    }

    #[tokio::test]
    async fn status_counts() {
        let repo = SqlitePharmacyRepo::new(test_pool().await);
        let mut approved = pharmacy("A", "NMRA-1", "a@x.lk");
        approved.approve().expect("approve");
        repo.save(&approved).await.expect("save");
        repo.save(&pharmacy("B", "NMRA-2", "b@x.lk")).await.expect("save");

        assert_eq!(repo.count_approved().await.expect("count"), 1);
        assert_eq!(repo.count_pending().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn status_update_persists() {
        let repo = SqlitePharmacyRepo::new(test_pool().await);
        let mut p = pharmacy("A", "NMRA-1", "a@x.lk");
        repo.save(&p).await.expect("save");
        p.reject("License expired").expect("reject");
        repo.save(&p).await.expect("update");

        let loaded = repo.get(p.id).await.expect("get").expect("present");
        assert_eq!(loaded.status, PharmacyStatus::Rejected);
        assert_eq!(loaded.rejection_reason.as_deref(), Some("License expired"));
    }
}
