//! Shop, renter and allocation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rentbook_core::billing::BillPeriod;
use rentbook_db::repositories::{
    AllocateShopInput, CreateRenterInput, CreateShopInput, PropertyRepository, TenantRepository,
};
use rentbook_shared::types::{AllocationId, RenterId, ShopId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Creates the property routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list_shops).post(create_shop))
        .route("/shops/{shop_id}", get(get_shop))
        .route("/shops/{shop_id}/allocation", get(get_active_allocation))
        .route("/renters", get(list_renters).post(create_renter))
        .route("/renters/{renter_id}", get(get_renter))
        .route("/renters/{renter_id}/balance", get(get_renter_balance))
        .route(
            "/allocations",
            get(list_period_allocations).post(allocate_shop),
        )
        .route("/allocations/{allocation_id}/end", post(end_allocation))
}

/// Query parameters for listing shops and renters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only active records (default: false).
    #[serde(default)]
    pub active: bool,
}

/// Request body for creating a shop.
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    /// Unique shop code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Floor label.
    pub floor: Option<String>,
    /// Floor area.
    pub area_sqft: Option<Decimal>,
    /// Monthly rent.
    pub monthly_rent: Decimal,
}

/// Request body for creating a renter.
#[derive(Debug, Deserialize)]
pub struct CreateRenterRequest {
    /// Renter or business name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Trade license number.
    pub trade_license: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Request body for allocating a shop.
#[derive(Debug, Deserialize)]
pub struct AllocateShopRequest {
    /// Shop being let.
    pub shop_id: Uuid,
    /// Renter taking it.
    pub renter_id: Uuid,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, or open-ended.
    pub end_date: Option<NaiveDate>,
}

/// Request body for ending an allocation.
#[derive(Debug, Deserialize)]
pub struct EndAllocationRequest {
    /// Last day of the allocation.
    pub end_date: NaiveDate,
}

/// Query parameters for the active allocation lookup.
#[derive(Debug, Deserialize)]
pub struct OnDateQuery {
    /// Date to check; today when omitted.
    pub on: Option<NaiveDate>,
}

/// Query parameters for listing a period's allocations.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Period, `YYYY-MM`.
    pub period: BillPeriod,
}

/// GET `/shops` - List shops.
async fn list_shops(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.list_shops(query.active).await {
        Ok(shops) => (StatusCode::OK, Json(json!({ "shops": shops }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/shops` - Create a shop.
async fn create_shop(
    State(state): State<AppState>,
    Json(payload): Json<CreateShopRequest>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    let input = CreateShopInput {
        code: payload.code,
        name: payload.name,
        floor: payload.floor,
        area_sqft: payload.area_sqft,
        monthly_rent: payload.monthly_rent,
    };

    match repo.create_shop(input).await {
        Ok(shop) => {
            info!(shop_id = %shop.id, code = %shop.code, "Shop created via API");
            (StatusCode::CREATED, Json(shop)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/shops/{shop_id}` - Get a shop.
async fn get_shop(State(state): State<AppState>, Path(shop_id): Path<Uuid>) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.get_shop(ShopId::from_uuid(shop_id)).await {
        Ok(shop) => (StatusCode::OK, Json(shop)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/shops/{shop_id}/allocation` - Who holds the shop on a date.
async fn get_active_allocation(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    Query(query): Query<OnDateQuery>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    let on = query.on.unwrap_or_else(|| Utc::now().date_naive());
    match repo.active_allocation(ShopId::from_uuid(shop_id), on).await {
        Ok(allocation) => (
            StatusCode::OK,
            Json(json!({ "on": on, "allocation": allocation })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/renters` - List renters.
async fn list_renters(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.list_renters(query.active).await {
        Ok(renters) => (StatusCode::OK, Json(json!({ "renters": renters }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/renters` - Create a renter.
async fn create_renter(
    State(state): State<AppState>,
    Json(payload): Json<CreateRenterRequest>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    let input = CreateRenterInput {
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        trade_license: payload.trade_license,
        address: payload.address,
    };

    match repo.create_renter(input).await {
        Ok(renter) => {
            info!(renter_id = %renter.id, "Renter created via API");
            (StatusCode::CREATED, Json(renter)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/renters/{renter_id}` - Get a renter.
async fn get_renter(State(state): State<AppState>, Path(renter_id): Path<Uuid>) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.get_renter(RenterId::from_uuid(renter_id)).await {
        Ok(renter) => (StatusCode::OK, Json(renter)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/renters/{renter_id}/balance` - What the renter owes.
async fn get_renter_balance(
    State(state): State<AppState>,
    Path(renter_id): Path<Uuid>,
) -> Response {
    let repo = TenantRepository::new((*state.db).clone());
    match repo.balance(RenterId::from_uuid(renter_id)).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({ "renter_id": renter_id, "balance": balance })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/allocations?period=` - Allocations in force during a period.
async fn list_period_allocations(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.allocations_for_period(query.period).await {
        Ok(allocations) => (
            StatusCode::OK,
            Json(json!({ "period": query.period, "allocations": allocations })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/allocations` - Let a shop to a renter.
async fn allocate_shop(
    State(state): State<AppState>,
    Json(payload): Json<AllocateShopRequest>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    let input = AllocateShopInput {
        shop_id: ShopId::from_uuid(payload.shop_id),
        renter_id: RenterId::from_uuid(payload.renter_id),
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    match repo.allocate_shop(input).await {
        Ok(allocation) => (StatusCode::CREATED, Json(allocation)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/allocations/{allocation_id}/end` - Close an allocation.
async fn end_allocation(
    State(state): State<AppState>,
    Path(allocation_id): Path<Uuid>,
    Json(payload): Json<EndAllocationRequest>,
) -> Response {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo
        .end_allocation(AllocationId::from_uuid(allocation_id), payload.end_date)
        .await
    {
        Ok(allocation) => (StatusCode::OK, Json(allocation)).into_response(),
        Err(e) => error_response(e),
    }
}
