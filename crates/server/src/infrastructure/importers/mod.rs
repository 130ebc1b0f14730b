mod catalog;

pub use catalog::{import_catalog_csv, ImportSummary};
