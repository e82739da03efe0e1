//! Bill drafting, generation and void routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rentbook_core::billing::{BillPeriod, BillStatus, ParticularKind};
use rentbook_db::repositories::{
    BillFilter, BillingRepository, GenerateBillsInput, StageMeterInput, StageParticularInput,
};
use rentbook_shared::types::{BillId, RenterId, ShopId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Creates the billing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bills/drafts", get(list_drafts).post(stage_particular))
        .route("/bills/drafts/meter", post(stage_meter_particular))
        .route("/bills/drafts/{draft_id}", delete(discard_draft))
        .route("/bills/generate", post(generate_bills))
        .route("/bills", get(list_bills))
        .route("/bills/{bill_id}", get(get_bill))
        .route("/bills/{bill_id}/void", post(void_bill))
        .route("/renters/{renter_id}/outstanding", get(list_outstanding))
}

/// Query parameters for listing drafts.
#[derive(Debug, Deserialize)]
pub struct DraftsQuery {
    /// Period, `YYYY-MM`.
    pub period: BillPeriod,
    /// Only this shop.
    pub shop_id: Option<Uuid>,
}

/// Request body for staging a fixed particular.
#[derive(Debug, Deserialize)]
pub struct StageParticularRequest {
    /// Shop billed.
    pub shop_id: Uuid,
    /// Period, `YYYY-MM`.
    pub period: BillPeriod,
    /// rent, electricity, gas, wasa or internet.
    pub kind: ParticularKind,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: Option<String>,
}

/// Request body for staging a metered particular.
#[derive(Debug, Deserialize)]
pub struct StageMeterRequest {
    /// Shop billed.
    pub shop_id: Uuid,
    /// Period, `YYYY-MM`.
    pub period: BillPeriod,
    /// electricity, gas or wasa.
    pub kind: ParticularKind,
    /// Previous reading; the last billed reading when omitted.
    pub previous: Option<Decimal>,
    /// Current reading.
    pub current: Decimal,
    /// Price per unit.
    pub unit_rate: Decimal,
    /// Description.
    pub description: Option<String>,
}

/// Request body for generating bills.
#[derive(Debug, Deserialize)]
pub struct GenerateBillsRequest {
    /// Period, `YYYY-MM`.
    pub period: BillPeriod,
    /// Bill date; the first day of the period when omitted.
    pub bill_date: Option<NaiveDate>,
    /// Due day of the month; the configured default when omitted.
    pub due_day: Option<u32>,
}

/// Query parameters for listing bills.
#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    /// Period, `YYYY-MM`.
    pub period: Option<BillPeriod>,
    /// Renter.
    pub renter_id: Option<Uuid>,
    /// Shop.
    pub shop_id: Option<Uuid>,
    /// unpaid, partially_paid, paid or void.
    pub status: Option<BillStatus>,
}

/// Request body for voiding a bill.
#[derive(Debug, Deserialize)]
pub struct VoidBillRequest {
    /// Date of the reversal.
    pub void_date: NaiveDate,
    /// Reason recorded on the bill.
    pub reason: Option<String>,
}

/// GET `/bills/drafts` - Staged particulars of a period.
async fn list_drafts(State(state): State<AppState>, Query(query): Query<DraftsQuery>) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo
        .list_drafts(query.period, query.shop_id.map(ShopId::from_uuid))
        .await
    {
        Ok(drafts) => (
            StatusCode::OK,
            Json(json!({ "period": query.period, "drafts": drafts })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/bills/drafts` - Stage a particular.
async fn stage_particular(
    State(state): State<AppState>,
    Json(payload): Json<StageParticularRequest>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    let input = StageParticularInput {
        shop_id: ShopId::from_uuid(payload.shop_id),
        period: payload.period,
        kind: payload.kind,
        amount: payload.amount,
        description: payload.description,
    };

    match repo.stage_particular(input).await {
        Ok(draft) => (StatusCode::CREATED, Json(draft)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/bills/drafts/meter` - Stage a metered particular from readings.
async fn stage_meter_particular(
    State(state): State<AppState>,
    Json(payload): Json<StageMeterRequest>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    let input = StageMeterInput {
        shop_id: ShopId::from_uuid(payload.shop_id),
        period: payload.period,
        kind: payload.kind,
        previous: payload.previous,
        current: payload.current,
        unit_rate: payload.unit_rate,
        description: payload.description,
    };

    match repo.stage_meter_particular(input).await {
        Ok(draft) => (StatusCode::CREATED, Json(draft)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/bills/drafts/{draft_id}` - Discard a staged particular.
async fn discard_draft(State(state): State<AppState>, Path(draft_id): Path<Uuid>) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo.discard_draft(draft_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/bills/generate` - Generate a period's bills.
async fn generate_bills(
    State(state): State<AppState>,
    Json(payload): Json<GenerateBillsRequest>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    let input = GenerateBillsInput {
        period: payload.period,
        bill_date: payload
            .bill_date
            .unwrap_or_else(|| payload.period.first_day()),
        due_day: payload.due_day.unwrap_or(state.billing.due_day),
    };

    match repo.generate_bills(input).await {
        Ok(report) => {
            info!(
                period = %report.period,
                generated = report.generated.len(),
                skipped = report.skipped.len(),
                "Bills generated via API"
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/bills` - List bills.
async fn list_bills(State(state): State<AppState>, Query(query): Query<ListBillsQuery>) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    let filter = BillFilter {
        period: query.period,
        renter_id: query.renter_id.map(RenterId::from_uuid),
        shop_id: query.shop_id.map(ShopId::from_uuid),
        status: query.status,
    };

    match repo.list_bills(filter).await {
        Ok(bills) => (StatusCode::OK, Json(json!({ "bills": bills }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/bills/{bill_id}` - Bill with particulars and collections.
async fn get_bill(State(state): State<AppState>, Path(bill_id): Path<Uuid>) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo.get_bill(BillId::from_uuid(bill_id)).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/bills/{bill_id}/void` - Void an unpaid bill.
async fn void_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(payload): Json<VoidBillRequest>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo
        .void_bill(BillId::from_uuid(bill_id), payload.void_date, payload.reason)
        .await
    {
        Ok(bill) => (StatusCode::OK, Json(bill)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/renters/{renter_id}/outstanding` - Bills still due, oldest first.
async fn list_outstanding(
    State(state): State<AppState>,
    Path(renter_id): Path<Uuid>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo.outstanding_bills(RenterId::from_uuid(renter_id)).await {
        Ok(bills) => {
            let total: Decimal = bills.iter().map(|bill| bill.due).sum();
            (
                StatusCode::OK,
                Json(json!({ "bills": bills, "total_due": total })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
