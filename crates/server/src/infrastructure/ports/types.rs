//! Query types shared between the use cases and the repositories.

use pharmstock_domain::{CatalogStatus, DomainError, InventoryItem, Medicine, PharmacyStatus};

/// Zero-based page request. Size is clamped by the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 20;
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size
                .unwrap_or(Self::DEFAULT_SIZE)
                .clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn offset(&self) -> u32 {
        self.page * self.size
    }
}

/// A page of results together with the total match count.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Paged<T> {
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.total.div_ceil(self.size as u64)
        }
    }
}

/// Dynamic catalog filter for the admin listing.
#[derive(Debug, Clone, Default)]
pub struct MedicineFilter {
    /// Free-text substring over generic name, brand name and reg no.
    pub q: Option<String>,
    pub status: Option<CatalogStatus>,
    pub manufacturer: Option<String>,
    pub country: Option<String>,
    pub brand: Option<String>,
}

/// Whitelisted sortable columns for the catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicineSortField {
    GenericName,
    BrandName,
    RegNo,
    Manufacturer,
    Country,
    Status,
    CreatedAt,
}

impl MedicineSortField {
    pub fn column(self) -> &'static str {
        match self {
            Self::GenericName => "generic_name",
            Self::BrandName => "brand_name",
            Self::RegNo => "reg_no",
            Self::Manufacturer => "manufacturer",
            Self::Country => "country",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedicineSort {
    pub field: MedicineSortField,
    pub ascending: bool,
}

impl Default for MedicineSort {
    fn default() -> Self {
        Self {
            field: MedicineSortField::GenericName,
            ascending: true,
        }
    }
}

impl MedicineSort {
    /// Parse a `field,asc|desc` sort expression. Unknown fields are rejected
    /// rather than passed to SQL.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or("").trim();
        let dir = parts.next().unwrap_or("asc").trim();

        let field = match field.to_ascii_lowercase().as_str() {
            "genericname" | "generic_name" => MedicineSortField::GenericName,
            "brandname" | "brand_name" => MedicineSortField::BrandName,
            "regno" | "reg_no" => MedicineSortField::RegNo,
            "manufacturer" => MedicineSortField::Manufacturer,
            "country" => MedicineSortField::Country,
            "status" => MedicineSortField::Status,
            "createdat" | "created_at" => MedicineSortField::CreatedAt,
            other => {
                return Err(DomainError::parse(format!("Unknown sort field: {other}")));
            }
        };
        let ascending = match dir.to_ascii_lowercase().as_str() {
            "asc" | "" => true,
            "desc" => false,
            other => {
                return Err(DomainError::parse(format!(
                    "Unknown sort direction: {other}"
                )));
            }
        };
        Ok(Self { field, ascending })
    }
}

/// Pharmacy listing filter for the admin review screen.
#[derive(Debug, Clone, Default)]
pub struct PharmacyFilter {
    pub status: Option<PharmacyStatus>,
    /// Case-insensitive substring over the legal entity name.
    pub q: Option<String>,
}

/// An inventory row joined with its catalog medicine.
#[derive(Debug, Clone)]
pub struct StockedMedicine {
    pub item: InventoryItem,
    pub medicine: Medicine,
}

/// Stock slices for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockCounts {
    pub in_stock: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parses_field_and_direction() {
        let sort = MedicineSort::parse("brandName,desc").expect("parses");
        assert_eq!(sort.field, MedicineSortField::BrandName);
        assert!(!sort.ascending);
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let sort = MedicineSort::parse("manufacturer").expect("parses");
        assert!(sort.ascending);
    }

    #[test]
    fn sort_rejects_unknown_fields() {
        assert!(MedicineSort::parse("password_hash,asc").is_err());
        assert!(MedicineSort::parse("generic_name,sideways").is_err());
    }

    #[test]
    fn page_clamps_size() {
        let page = Page::new(Some(3), Some(10_000));
        assert_eq!(page.size, Page::MAX_SIZE);
        assert_eq!(page.offset(), 300);
    }

    #[test]
    fn paged_total_pages_rounds_up() {
        let paged: Paged<u8> = Paged {
            items: vec![],
            total: 21,
            page: 0,
            size: 10,
        };
        assert_eq!(paged.total_pages(), 3);
    }
}
