//! Routes that need no session: registration, catalog browsing, the public
//! storefront listing and the drug-info proxy.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use pharmstock_domain::{DomainError, MedicineId, PharmacyRegistration};
use serde::Deserialize;
use validator::Validate;

use super::dto::{MedicineDto, PublicPharmacyDto, SuggestionDto};
use super::{ApiError, ApiResponse};
use crate::app::App;
use crate::infrastructure::ports::DrugInfo;

pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/v1/pharmacies/register", post(register_pharmacy))
        .route("/api/medicines/suggest", get(suggest_medicines))
        .route("/api/medicines/all", get(all_medicines))
        .route("/api/medicines/{id}", get(get_medicine))
        .route(
            "/api/public/pharmacies-with-inventory",
            get(pharmacies_with_inventory),
        )
        .route("/api/drug-info", get(drug_info))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPharmacyRequest {
    #[validate(length(min = 1, message = "Legal entity name is required"))]
    pub legal_entity_name: String,
    pub trade_name: Option<String>,
    #[validate(length(min = 1, message = "NMRA license is required"))]
    pub nmra_license: String,
    #[validate(length(min = 1, message = "Business registration number is required"))]
    pub business_reg_no: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Telephone is required"))]
    pub telephone: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Entity type is required"))]
    pub entity_type: String,
    #[validate(length(min = 1, message = "Contact name is required"))]
    pub contact_full_name: String,
    #[validate(length(min = 1, message = "Contact title is required"))]
    pub contact_title: String,
    #[validate(length(min = 1, message = "Contact phone is required"))]
    pub contact_phone: String,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    pub declaration_date: NaiveDate,
    pub agreed_to_declaration: bool,
}

async fn register_pharmacy(
    State(app): State<Arc<App>>,
    Json(payload): Json<RegisterPharmacyRequest>,
) -> Result<Json<ApiResponse<super::dto::PharmacyDto>>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let pharmacy = app
        .use_cases
        .pharmacy
        .register
        .execute(PharmacyRegistration {
            legal_entity_name: payload.legal_entity_name,
            trade_name: payload.trade_name,
            nmra_license: payload.nmra_license,
            business_reg_no: payload.business_reg_no,
            address: payload.address,
            telephone: payload.telephone,
            email: payload.email,
            entity_type: payload.entity_type,
            contact_full_name: payload.contact_full_name,
            contact_title: payload.contact_title,
            contact_phone: payload.contact_phone,
            contact_email: payload.contact_email,
            declaration_date: payload.declaration_date,
            agreed_to_declaration: payload.agreed_to_declaration,
        })
        .await?;

    Ok(ApiResponse::ok_with_message(
        "Registration submitted for review",
        pharmacy.into(),
    ))
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    #[serde(default)]
    q: String,
}

async fn suggest_medicines(
    State(app): State<Arc<App>>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<ApiResponse<Vec<SuggestionDto>>>, ApiError> {
    let medicines = app.use_cases.catalog.suggest.execute(&params.q).await?;
    let suggestions = medicines.iter().map(SuggestionDto::from).collect();
    Ok(ApiResponse::ok(suggestions))
}

async fn all_medicines(
    State(app): State<Arc<App>>,
) -> Result<Json<ApiResponse<Vec<MedicineDto>>>, ApiError> {
    let medicines = app.repositories.medicine.list_all().await?;
    Ok(ApiResponse::ok(
        medicines.into_iter().map(MedicineDto::from).collect(),
    ))
}

async fn get_medicine(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MedicineDto>>, ApiError> {
    let id = MedicineId::parse(&id)
        .map_err(|_| DomainError::not_found("Medicine", id.clone()))
        .map_err(ApiError::from)?;
    let medicine = app.use_cases.catalog.manage.get(id).await?;
    Ok(ApiResponse::ok(medicine.into()))
}

async fn pharmacies_with_inventory(
    State(app): State<Arc<App>>,
) -> Result<Json<ApiResponse<Vec<PublicPharmacyDto>>>, ApiError> {
    let listings = app.use_cases.listing.public_inventory.execute().await?;
    Ok(ApiResponse::ok(
        listings.into_iter().map(PublicPharmacyDto::from).collect(),
    ))
}

#[derive(Debug, Deserialize)]
struct DrugInfoParams {
    #[serde(default)]
    name: String,
}

async fn drug_info(
    State(app): State<Arc<App>>,
    Query(params): Query<DrugInfoParams>,
) -> Result<Json<ApiResponse<DrugInfo>>, ApiError> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Drug name is required".into()));
    }
    let info = app
        .drug_label
        .fetch(name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No drug information found for {name}")))?;
    Ok(ApiResponse::ok(info))
}
