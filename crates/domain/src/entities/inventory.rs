//! Per-pharmacy stock of a catalog medicine.
//!
//! Prices are stored as integer cents; the API speaks decimal strings, so
//! the parse/format helpers live here next to the entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{InventoryItemId, MedicineId, PharmacyId};

/// Below or at this quantity an item counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub pharmacy_id: PharmacyId,
    pub medicine_id: MedicineId,
    pub quantity: i64,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(
        pharmacy_id: PharmacyId,
        medicine_id: MedicineId,
        quantity: i64,
        price_cents: i64,
        at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_stock(quantity, price_cents)?;
        Ok(Self {
            id: InventoryItemId::new(),
            pharmacy_id,
            medicine_id,
            quantity,
            price_cents,
            created_at: at,
            updated_at: at,
        })
    }

    pub fn restock(
        &mut self,
        quantity: i64,
        price_cents: i64,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        validate_stock(quantity, price_cents)?;
        self.quantity = quantity;
        self.price_cents = price_cents;
        self.updated_at = at;
        Ok(())
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    pub fn low_stock(&self) -> bool {
        self.quantity > 0 && self.quantity <= LOW_STOCK_THRESHOLD
    }
}

fn validate_stock(quantity: i64, price_cents: i64) -> Result<(), DomainError> {
    if quantity < 0 {
        return Err(DomainError::validation("Quantity cannot be negative"));
    }
    if price_cents < 0 {
        return Err(DomainError::validation("Price cannot be negative"));
    }
    Ok(())
}

/// Parse a decimal price string ("12", "12.5", "12.50") into cents.
/// At most two fraction digits are accepted.
pub fn parse_price(s: &str) -> Result<i64, DomainError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DomainError::parse("Price is required"));
    }
    // The whole part of "-0.50" parses to 0, so the sign has to be checked
    // on the raw string.
    if s.starts_with('-') {
        return Err(DomainError::parse("Price cannot be negative"));
    }
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if frac.len() > 2 {
        return Err(DomainError::parse(format!(
            "Price has too many decimal places: {s}"
        )));
    }
    let whole: i64 = whole
        .parse()
        .map_err(|_| DomainError::parse(format!("Invalid price: {s}")))?;
    let frac_cents: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<2}");
        padded
            .parse()
            .map_err(|_| DomainError::parse(format!("Invalid price: {s}")))?
    };
    whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac_cents))
        .ok_or_else(|| DomainError::parse(format!("Price out of range: {s}")))
}

/// Render cents back into a two-decimal string for API responses.
pub fn format_price(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
