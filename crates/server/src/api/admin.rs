//! Admin routes: session auth, pharmacy review and catalog management.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{HeaderMap, SET_COOKIE};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use pharmstock_domain::{CatalogStatus, DomainError, MedicineId, PharmacyId, PharmacyStatus};
use serde::{Deserialize, Serialize};

use super::dto::{MedicineDto, PagedDto, PharmacyDto, SuggestionDto};
use super::session::{clear_session_cookie, require_admin, revoke, session_cookie};
use super::{ApiError, ApiResponse};
use crate::app::App;
use crate::infrastructure::ports::{MedicineFilter, MedicineSort, Page, PharmacyFilter};
use crate::use_cases::catalog::{DashboardSummary, MedicineDraft};

pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/admin/pharmacies", get(list_pharmacies))
        .route(
            "/api/v1/admin/pharmacies/{id}/approve",
            patch(approve_pharmacy),
        )
        .route(
            "/api/v1/admin/pharmacies/{id}/reject",
            patch(reject_pharmacy),
        )
        .route(
            "/api/v1/admin/medicines",
            get(search_medicines).post(create_medicine),
        )
        .route(
            "/api/v1/admin/medicines/filters/manufacturers",
            get(list_manufacturers),
        )
        .route("/api/v1/admin/medicines/filters/brands", get(list_brands))
        .route("/api/v1/admin/medicines/suggest", get(suggest_medicines))
        .route(
            "/api/v1/admin/medicines/{id}",
            get(get_medicine)
                .put(update_medicine)
                .delete(delete_medicine),
        )
        .route("/api/v1/admin/summary", get(summary))
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminLoginRequest {
    username: String,
    password: String,
    security_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeDto {
    username: String,
    role: String,
}

async fn login(
    State(app): State<Arc<App>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<([(axum::http::HeaderName, String); 1], Json<ApiResponse<MeDto>>), ApiError> {
    let user = app
        .use_cases
        .auth
        .admin_login
        .execute(&payload.username, &payload.password, &payload.security_key)
        .await?;

    let token = app.sessions.create(&user, app.clock.now());
    Ok((
        [(SET_COOKIE, session_cookie(token))],
        ApiResponse::ok_with_message(
            "Logged in",
            MeDto {
                username: user.username,
                role: user.role.to_string(),
            },
        ),
    ))
}

async fn me(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MeDto>>, ApiError> {
    let session = require_admin(&app, &headers)?;
    Ok(ApiResponse::ok(MeDto {
        username: session.username,
        role: session.role.to_string(),
    }))
}

async fn logout(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> ([(axum::http::HeaderName, String); 1], Json<ApiResponse<()>>) {
    revoke(&app, &headers);
    (
        [(SET_COOKIE, clear_session_cookie())],
        ApiResponse::message("Logged out"),
    )
}

// =============================================================================
// Pharmacy review
// =============================================================================

#[derive(Debug, Deserialize)]
struct PharmacyListParams {
    status: Option<String>,
    q: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<PharmacyStatus>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse::<PharmacyStatus>()
            .map(Some)
            .map_err(ApiError::from),
    }
}

async fn list_pharmacies(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Query(params): Query<PharmacyListParams>,
) -> Result<Json<ApiResponse<PagedDto<PharmacyDto>>>, ApiError> {
    require_admin(&app, &headers)?;
    let filter = PharmacyFilter {
        status: parse_status_filter(params.status.as_deref())?,
        q: params.q.filter(|q| !q.trim().is_empty()),
    };
    let paged = app
        .use_cases
        .pharmacy
        .list
        .execute(filter, Page::new(params.page, params.size))
        .await?;
    Ok(ApiResponse::ok(PagedDto::map(paged, PharmacyDto::from)))
}

fn parse_pharmacy_id(raw: &str) -> Result<PharmacyId, ApiError> {
    PharmacyId::parse(raw)
        .map_err(|_| DomainError::not_found("Pharmacy", raw.to_string()).into())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApprovalDto {
    username: String,
    setup_link: String,
    expires_at: DateTime<Utc>,
}

async fn approve_pharmacy(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ApprovalDto>>, ApiError> {
    require_admin(&app, &headers)?;
    let outcome = app
        .use_cases
        .pharmacy
        .approve
        .execute(parse_pharmacy_id(&id)?)
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Pharmacy approved",
        ApprovalDto {
            username: outcome.username,
            setup_link: outcome.setup_link,
            expires_at: outcome.expires_at,
        },
    ))
}

#[derive(Debug, Deserialize)]
struct RejectRequest {
    reason: String,
}

async fn reject_pharmacy(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<ApiResponse<PharmacyDto>>, ApiError> {
    require_admin(&app, &headers)?;
    let pharmacy = app
        .use_cases
        .pharmacy
        .reject
        .execute(parse_pharmacy_id(&id)?, &payload.reason)
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Pharmacy rejected",
        pharmacy.into(),
    ))
}

// =============================================================================
// Catalog management
// =============================================================================

#[derive(Debug, Deserialize)]
struct MedicineSearchParams {
    q: Option<String>,
    status: Option<String>,
    manufacturer: Option<String>,
    country: Option<String>,
    brand: Option<String>,
    sort: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
}

async fn search_medicines(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Query(params): Query<MedicineSearchParams>,
) -> Result<Json<ApiResponse<PagedDto<MedicineDto>>>, ApiError> {
    require_admin(&app, &headers)?;

    let status = match params.status.as_deref() {
        None => None,
        Some(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") => None,
        Some(s) => Some(s.parse::<CatalogStatus>().map_err(ApiError::from)?),
    };
    let filter = MedicineFilter {
        q: params.q.filter(|q| !q.trim().is_empty()),
        status,
        manufacturer: params.manufacturer.filter(|m| !m.trim().is_empty()),
        country: params.country.filter(|c| !c.trim().is_empty()),
        brand: params.brand.filter(|b| !b.trim().is_empty()),
    };
    let sort = match params.sort.as_deref() {
        None => MedicineSort::default(),
        Some(s) => MedicineSort::parse(s).map_err(ApiError::from)?,
    };

    let paged = app
        .use_cases
        .catalog
        .search
        .execute(filter, sort, Page::new(params.page, params.size))
        .await?;
    Ok(ApiResponse::ok(PagedDto::map(paged, MedicineDto::from)))
}

async fn list_manufacturers(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    require_admin(&app, &headers)?;
    Ok(ApiResponse::ok(
        app.use_cases.catalog.search.manufacturers().await?,
    ))
}

async fn list_brands(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    require_admin(&app, &headers)?;
    Ok(ApiResponse::ok(app.use_cases.catalog.search.brands().await?))
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    #[serde(default)]
    q: String,
}

async fn suggest_medicines(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Query(params): Query<SuggestParams>,
) -> Result<Json<ApiResponse<Vec<SuggestionDto>>>, ApiError> {
    require_admin(&app, &headers)?;
    let medicines = app.use_cases.catalog.suggest.execute(&params.q).await?;

    // De-duplicate on the display name; the catalog carries many pack-size
    // variants of the same product.
    let mut seen = std::collections::HashSet::new();
    let suggestions = medicines
        .iter()
        .map(SuggestionDto::from)
        .filter(|s| seen.insert(s.name.clone()))
        .collect();
    Ok(ApiResponse::ok(suggestions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MedicinePayload {
    reg_no: String,
    generic_name: Option<String>,
    brand_name: Option<String>,
    dosage: Option<String>,
    pack_size: Option<String>,
    pack_type: Option<String>,
    manufacturer: Option<String>,
    country: Option<String>,
    agent: Option<String>,
    reg_date: Option<NaiveDate>,
    schedule: Option<String>,
    validation: Option<String>,
    dossier_no: Option<String>,
    status: Option<String>,
}

impl MedicinePayload {
    fn into_draft(self) -> Result<MedicineDraft, ApiError> {
        let status = match self.status.as_deref() {
            None => None,
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s.parse::<CatalogStatus>().map_err(ApiError::from)?),
        };
        Ok(MedicineDraft {
            reg_no: self.reg_no,
            generic_name: self.generic_name,
            brand_name: self.brand_name,
            dosage: self.dosage,
            pack_size: self.pack_size,
            pack_type: self.pack_type,
            manufacturer: self.manufacturer,
            country: self.country,
            agent: self.agent,
            reg_date: self.reg_date,
            schedule: self.schedule,
            validation: self.validation,
            dossier_no: self.dossier_no,
            status,
        })
    }
}

fn parse_medicine_id(raw: &str) -> Result<MedicineId, ApiError> {
    MedicineId::parse(raw)
        .map_err(|_| DomainError::not_found("Medicine", raw.to_string()).into())
}

async fn create_medicine(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Json(payload): Json<MedicinePayload>,
) -> Result<Json<ApiResponse<MedicineDto>>, ApiError> {
    require_admin(&app, &headers)?;
    let medicine = app
        .use_cases
        .catalog
        .manage
        .create(payload.into_draft()?)
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Medicine created",
        medicine.into(),
    ))
}

async fn get_medicine(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MedicineDto>>, ApiError> {
    require_admin(&app, &headers)?;
    let medicine = app
        .use_cases
        .catalog
        .manage
        .get(parse_medicine_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(medicine.into()))
}

async fn update_medicine(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<MedicinePayload>,
) -> Result<Json<ApiResponse<MedicineDto>>, ApiError> {
    require_admin(&app, &headers)?;
    let medicine = app
        .use_cases
        .catalog
        .manage
        .update(parse_medicine_id(&id)?, payload.into_draft()?)
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Medicine updated",
        medicine.into(),
    ))
}

async fn delete_medicine(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&app, &headers)?;
    app.use_cases
        .catalog
        .manage
        .delete(parse_medicine_id(&id)?)
        .await?;
    Ok(ApiResponse::message("Medicine deleted"))
}

async fn summary(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    require_admin(&app, &headers)?;
    Ok(ApiResponse::ok(
        app.use_cases.catalog.summary.execute().await?,
    ))
}
