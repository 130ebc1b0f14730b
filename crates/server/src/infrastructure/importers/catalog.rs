//! One-time CSV bootstrap of the medicine master catalog.
//!
//! Runs at startup and does nothing when the table already has rows. Rows
//! without a registration number and duplicate registration numbers inside
//! the file are skipped; unparsable dates become NULL.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use pharmstock_domain::Medicine;

use crate::infrastructure::ports::{MedicineRepo, RepoError};

const BATCH_SIZE: usize = 500;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped_duplicates: usize,
    pub skipped: bool,
}

/// Import `csv` (header line first) into the catalog unless it already has
/// data. Expected columns: reg_no, generic_name, brand_name, dosage,
/// pack_size, pack_type, manufacturer, country, agent, reg_date, schedule,
/// validation, dossier_no.
pub async fn import_catalog_csv(
    repo: &Arc<dyn MedicineRepo>,
    csv: &str,
) -> Result<ImportSummary, RepoError> {
    if repo.count().await? > 0 {
        tracing::info!("medicine_master already has data, skipping CSV import");
        return Ok(ImportSummary {
            skipped: true,
            ..Default::default()
        });
    }

    let mut lines = csv.lines();
    // Header line.
    if lines.next().is_none() {
        return Ok(ImportSummary::default());
    }

    let mut seen_reg_nos: HashSet<String> = HashSet::new();
    let mut batch: Vec<Medicine> = Vec::with_capacity(BATCH_SIZE);
    let mut summary = ImportSummary::default();
    let now = Utc::now();

    for line in lines {
        let columns: Vec<&str> = line.split(',').collect();

        let Some(reg_no) = clean(&columns, 0) else {
            continue;
        };
        if !seen_reg_nos.insert(reg_no.clone()) {
            summary.skipped_duplicates += 1;
            continue;
        }

        let mut medicine = match Medicine::new(reg_no, now) {
            Ok(m) => m,
            Err(_) => continue,
        };
        medicine.generic_name = clean(&columns, 1);
        medicine.brand_name = clean(&columns, 2);
        medicine.dosage = clean(&columns, 3);
        medicine.pack_size = clean(&columns, 4);
        medicine.pack_type = clean(&columns, 5);
        medicine.manufacturer = clean(&columns, 6);
        medicine.country = clean(&columns, 7);
        medicine.agent = clean(&columns, 8);
        medicine.reg_date = clean(&columns, 9).and_then(|s| parse_date(&s));
        medicine.schedule = clean(&columns, 10);
        medicine.validation = clean(&columns, 11);
        medicine.dossier_no = clean(&columns, 12);

        batch.push(medicine);
        if batch.len() == BATCH_SIZE {
            repo.insert_batch(&batch).await?;
            summary.imported += batch.len();
            batch.clear();
            tracing::info!(imported = summary.imported, "Importing medicines...");
        }
    }

    if !batch.is_empty() {
        repo.insert_batch(&batch).await?;
        summary.imported += batch.len();
    }

    tracing::info!(
        imported = summary.imported,
        skipped_duplicates = summary.skipped_duplicates,
        "Imported medicine_master"
    );
    Ok(summary)
}

/// Trimmed column value with surrounding quotes removed; empty becomes None.
fn clean(columns: &[&str], index: usize) -> Option<String> {
    let mut value = columns.get(index)?.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value = value[1..value.len() - 1].trim();
    }
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::{test_pool, SqliteMedicineRepo};

    async fn repo() -> Arc<dyn MedicineRepo> {
        Arc::new(SqliteMedicineRepo::new(test_pool().await))
    }

    #[tokio::test]
    async fn imports_rows_and_dedups_reg_nos() {
        let repo = repo().await;
        let csv = "reg_no,generic,brand,dosage,pack_size,pack_type,manufacturer,country,agent,reg_date,schedule,validation,dossier_no\n\
                   R1,Paracetamol,\"Panadol\",500mg,10,Blister,GSK,UK,,2020-01-15,OTC,,D1\n\
                   R2,Ibuprofen,Brufen,,,,Abbott,US,,not-a-date,,,\n\
                   R1,Paracetamol,Duplicate,,,,,,,,,,\n\
                   ,NoRegNo,,,,,,,,,,,\n";

        let summary = import_catalog_csv(&repo, csv).await.expect("import");
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped_duplicates, 1);
        assert!(!summary.skipped);

        let m = repo
            .get_by_reg_no("R1")
            .await
            .expect("get")
            .expect("present");
        assert_eq!(m.brand_name.as_deref(), Some("Panadol"));
        assert_eq!(
            m.reg_date,
            NaiveDate::from_ymd_opt(2020, 1, 15)
        );

        // Lenient date handling: bad dates become NULL.
        let m = repo
            .get_by_reg_no("R2")
            .await
            .expect("get")
            .expect("present");
        assert!(m.reg_date.is_none());
    }

    #[tokio::test]
    async fn skips_when_catalog_not_empty() {
        let repo = repo().await;
        let csv = "header\nR1,Paracetamol\n";
        import_catalog_csv(&repo, csv).await.expect("import");

        let summary = import_catalog_csv(&repo, "header\nR9,Other\n")
            .await
            .expect("import");
        assert!(summary.skipped);
        assert!(repo.get_by_reg_no("R9").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn empty_file_imports_nothing() {
        let repo = repo().await;
        let summary = import_catalog_csv(&repo, "").await.expect("import");
        assert_eq!(summary, ImportSummary::default());
    }
}
