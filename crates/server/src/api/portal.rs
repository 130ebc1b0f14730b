//! Pharmacy portal routes: account lifecycle plus the session-guarded
//! profile, inventory and activity endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::{HeaderMap, SET_COOKIE};
use axum::routing::{get, post};
use axum::{Json, Router};
use pharmstock_domain::{parse_price, DomainError, InventoryItemId, MedicineId};
use serde::{Deserialize, Serialize};

use super::dto::{ActivityDto, InventoryRowDto, PharmacyDto};
use super::session::{clear_session_cookie, require_pharmacy, revoke, session_cookie};
use super::{ApiError, ApiResponse};
use crate::app::App;
use crate::use_cases::auth::SetPasswordRequest;
use crate::use_cases::inventory::StockRequest;
use crate::use_cases::pharmacy::ProfileUpdate;

const ACTIVITY_LIMIT: u32 = 20;

pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/v1/pharmacies/login", post(login))
        .route("/api/v1/pharmacies/logout", post(logout))
        .route("/api/v1/pharmacies/set-password", post(set_password))
        .route("/api/v1/pharmacies/forgot-password", post(forgot_password))
        .route("/api/v1/pharmacies/me", get(me).patch(update_profile))
        .route(
            "/api/v1/pharmacies/inventory",
            get(list_inventory).post(upsert_inventory),
        )
        .route(
            "/api/v1/pharmacies/inventory/{id}",
            axum::routing::put(update_inventory).delete(remove_inventory),
        )
        .route("/api/v1/pharmacies/activity", get(activity))
}

// =============================================================================
// Account lifecycle
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginDto {
    username: String,
    pharmacy_id: Option<String>,
}

async fn login(
    State(app): State<Arc<App>>,
    Json(payload): Json<LoginRequest>,
) -> Result<([(axum::http::HeaderName, String); 1], Json<ApiResponse<LoginDto>>), ApiError> {
    let user = app
        .use_cases
        .auth
        .pharmacy_login
        .execute(&payload.username, &payload.password)
        .await?;

    let token = app.sessions.create(&user, app.clock.now());
    Ok((
        [(SET_COOKIE, session_cookie(token))],
        ApiResponse::ok_with_message(
            "Logged in",
            LoginDto {
                username: user.username,
                pharmacy_id: user.pharmacy_id.map(|id| id.to_string()),
            },
        ),
    ))
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetPasswordPayload {
    token: String,
    password: String,
    confirm_password: String,
    latitude: f64,
    longitude: f64,
}

async fn set_password(
    State(app): State<Arc<App>>,
    Json(payload): Json<SetPasswordPayload>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    app.use_cases
        .auth
        .set_password
        .execute(SetPasswordRequest {
            token: payload.token,
            password: payload.password,
            confirm_password: payload.confirm_password,
            latitude: payload.latitude,
            longitude: payload.longitude,
        })
        .await?;
    Ok(ApiResponse::message(
        "Password set. You can now log in to the portal.",
    ))
}

#[derive(Debug, Deserialize)]
struct ForgotPasswordRequest {
    email: String,
}

async fn forgot_password(
    State(app): State<Arc<App>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    app.use_cases
        .auth
        .forgot_password
        .execute(&payload.email)
        .await?;
    // Same answer whether or not the address exists.
    Ok(ApiResponse::message(
        "If the account exists, a reset link has been sent.",
    ))
}

// =============================================================================
// Profile
// =============================================================================

async fn me(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<PharmacyDto>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    let pharmacy = app
        .repositories
        .pharmacy
        .get(pharmacy_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Pharmacy", pharmacy_id.to_string()))
        .map_err(ApiError::from)?;
    Ok(ApiResponse::ok(pharmacy.into()))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ProfilePatch {
    trade_name: Option<String>,
    telephone: Option<String>,
    contact_full_name: Option<String>,
    contact_title: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    about: Option<String>,
    opening_hours_json: Option<String>,
}

async fn update_profile(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Json(payload): Json<ProfilePatch>,
) -> Result<Json<ApiResponse<PharmacyDto>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    let pharmacy = app
        .use_cases
        .pharmacy
        .update_profile
        .execute(
            pharmacy_id,
            ProfileUpdate {
                trade_name: payload.trade_name,
                telephone: payload.telephone,
                contact_full_name: payload.contact_full_name,
                contact_title: payload.contact_title,
                contact_phone: payload.contact_phone,
                contact_email: payload.contact_email,
                about: payload.about,
                opening_hours_json: payload.opening_hours_json,
            },
        )
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Profile updated",
        pharmacy.into(),
    ))
}

// =============================================================================
// Inventory
// =============================================================================

async fn list_inventory(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<InventoryRowDto>>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    let rows = app
        .repositories
        .inventory
        .list_for_pharmacy(pharmacy_id)
        .await?;
    Ok(ApiResponse::ok(
        rows.into_iter().map(InventoryRowDto::from).collect(),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertInventoryRequest {
    medicine_id: String,
    stock: i64,
    /// Decimal string, e.g. "120.50".
    price: String,
}

async fn upsert_inventory(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Json(payload): Json<UpsertInventoryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    let medicine_id = MedicineId::parse(&payload.medicine_id)
        .map_err(|_| DomainError::not_found("Medicine", payload.medicine_id.clone()))
        .map_err(ApiError::from)?;
    let price_cents = parse_price(&payload.price).map_err(ApiError::from)?;

    let item = app
        .use_cases
        .inventory
        .upsert
        .execute(
            pharmacy_id,
            StockRequest {
                medicine_id,
                quantity: payload.stock,
                price_cents,
            },
        )
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Inventory saved",
        serde_json::json!({ "id": item.id.to_string() }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockRequest {
    stock: i64,
    price: String,
}

fn parse_item_id(raw: &str) -> Result<InventoryItemId, ApiError> {
    InventoryItemId::parse(raw)
        .map_err(|_| DomainError::not_found("Inventory item", raw.to_string()).into())
}

async fn update_inventory(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<RestockRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    let price_cents = parse_price(&payload.price).map_err(ApiError::from)?;
    let item = app
        .use_cases
        .inventory
        .update
        .execute(pharmacy_id, parse_item_id(&id)?, payload.stock, price_cents)
        .await?;
    Ok(ApiResponse::ok_with_message(
        "Inventory updated",
        serde_json::json!({ "id": item.id.to_string(), "stock": item.quantity }),
    ))
}

async fn remove_inventory(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    app.use_cases
        .inventory
        .remove
        .execute(pharmacy_id, parse_item_id(&id)?)
        .await?;
    Ok(ApiResponse::message("Inventory item removed"))
}

async fn activity(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<ActivityDto>>>, ApiError> {
    let (_, pharmacy_id) = require_pharmacy(&app, &headers)?;
    let entries = app
        .repositories
        .activity
        .latest_for_pharmacy(pharmacy_id, ACTIVITY_LIMIT)
        .await?;
    Ok(ApiResponse::ok(
        entries.into_iter().map(ActivityDto::from).collect(),
    ))
}
