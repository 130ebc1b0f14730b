//! Response DTOs. Field names follow the frontend's camelCase convention;
//! prices cross the wire as two-decimal strings.

use chrono::{DateTime, NaiveDate, Utc};
use pharmstock_domain::{
    format_price, ActivityAction, CatalogStatus, InventoryActivity, Medicine, Pharmacy,
    PharmacyLocation, PharmacyStatus,
};
use serde::Serialize;

use crate::infrastructure::ports::{Paged, StockedMedicine};
use crate::use_cases::listing::PharmacyListing;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDto {
    pub id: String,
    pub reg_no: String,
    pub generic_name: Option<String>,
    pub brand_name: Option<String>,
    pub dosage: Option<String>,
    pub pack_size: Option<String>,
    pub pack_type: Option<String>,
    pub manufacturer: Option<String>,
    pub country: Option<String>,
    pub agent: Option<String>,
    pub reg_date: Option<NaiveDate>,
    pub schedule: Option<String>,
    pub validation: Option<String>,
    pub dossier_no: Option<String>,
    pub status: CatalogStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Medicine> for MedicineDto {
    fn from(m: Medicine) -> Self {
        Self {
            id: m.id.to_string(),
            reg_no: m.reg_no,
            generic_name: m.generic_name,
            brand_name: m.brand_name,
            dosage: m.dosage,
            pack_size: m.pack_size,
            pack_type: m.pack_type,
            manufacturer: m.manufacturer,
            country: m.country,
            agent: m.agent,
            reg_date: m.reg_date,
            schedule: m.schedule,
            validation: m.validation,
            dossier_no: m.dossier_no,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

/// Autocomplete entry: id plus the display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDto {
    pub id: String,
    pub name: String,
}

impl From<&Medicine> for SuggestionDto {
    fn from(m: &Medicine) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.display_name(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyDto {
    pub id: String,
    pub legal_entity_name: String,
    pub trade_name: Option<String>,
    pub nmra_license: String,
    pub business_reg_no: String,
    pub address: String,
    pub telephone: String,
    pub email: String,
    pub entity_type: String,
    pub contact_full_name: String,
    pub contact_title: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub declaration_date: NaiveDate,
    pub about: Option<String>,
    pub opening_hours_json: Option<String>,
    pub status: PharmacyStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Pharmacy> for PharmacyDto {
    fn from(p: Pharmacy) -> Self {
        Self {
            id: p.id.to_string(),
            legal_entity_name: p.legal_entity_name,
            trade_name: p.trade_name,
            nmra_license: p.nmra_license,
            business_reg_no: p.business_reg_no,
            address: p.address,
            telephone: p.telephone,
            email: p.email,
            entity_type: p.entity_type,
            contact_full_name: p.contact_full_name,
            contact_title: p.contact_title,
            contact_phone: p.contact_phone,
            contact_email: p.contact_email,
            declaration_date: p.declaration_date,
            about: p.about,
            opening_hours_json: p.opening_hours_json,
            status: p.status,
            rejection_reason: p.rejection_reason,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRowDto {
    pub id: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub reg_no: String,
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub stock: i64,
    /// Two-decimal price string, e.g. "120.50".
    pub price: String,
    pub in_stock: bool,
    pub low_stock: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<StockedMedicine> for InventoryRowDto {
    fn from(s: StockedMedicine) -> Self {
        Self {
            id: s.item.id.to_string(),
            medicine_id: s.medicine.id.to_string(),
            medicine_name: s.medicine.display_name(),
            reg_no: s.medicine.reg_no.clone(),
            dosage: s.medicine.dosage.clone(),
            manufacturer: s.medicine.manufacturer.clone(),
            stock: s.item.quantity,
            price: format_price(s.item.price_cents),
            in_stock: s.item.in_stock(),
            low_stock: s.item.low_stock(),
            updated_at: s.item.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub id: String,
    pub medicine_id: Option<String>,
    pub action: ActivityAction,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl From<InventoryActivity> for ActivityDto {
    fn from(a: InventoryActivity) -> Self {
        Self {
            id: a.id.to_string(),
            medicine_id: a.medicine_id.map(|m| m.to_string()),
            action: a.action,
            message: a.message,
            occurred_at: a.occurred_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<PharmacyLocation> for LocationDto {
    fn from(l: PharmacyLocation) -> Self {
        Self {
            latitude: l.latitude,
            longitude: l.longitude,
        }
    }
}

/// Storefront entry for the public map/listing page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPharmacyDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub telephone: String,
    pub about: Option<String>,
    pub opening_hours_json: Option<String>,
    pub location: Option<LocationDto>,
    pub inventory: Vec<InventoryRowDto>,
}

impl From<PharmacyListing> for PublicPharmacyDto {
    fn from(listing: PharmacyListing) -> Self {
        Self {
            id: listing.pharmacy.id.to_string(),
            name: listing.pharmacy.display_name().to_string(),
            address: listing.pharmacy.address.clone(),
            telephone: listing.pharmacy.telephone.clone(),
            about: listing.pharmacy.about.clone(),
            opening_hours_json: listing.pharmacy.opening_hours_json.clone(),
            location: listing.location.map(LocationDto::from),
            inventory: listing
                .inventory
                .into_iter()
                .map(InventoryRowDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedDto<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
}

impl<T: Serialize> PagedDto<T> {
    pub fn map<S>(paged: Paged<S>, f: impl FnMut(S) -> T) -> Self {
        let total_pages = paged.total_pages();
        Self {
            items: paged.items.into_iter().map(f).collect(),
            total: paged.total,
            page: paged.page,
            size: paged.size,
            total_pages,
        }
    }
}
