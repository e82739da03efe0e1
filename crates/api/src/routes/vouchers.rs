//! Voucher routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rentbook_core::ledger::PostingLine;
use rentbook_db::entities::sea_orm_active_enums::VoucherType;
use rentbook_db::repositories::{CreateVoucherInput, VoucherRepository};
use rentbook_shared::types::VoucherId;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vouchers", post(create_voucher).get(list_vouchers))
        .route("/vouchers/{voucher_id}", get(get_voucher))
}

/// Request body for creating a voucher.
#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    /// payment, receipt or journal.
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    /// Business date.
    pub voucher_date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Reference; unique when given.
    pub reference: Option<String>,
    /// Lines as `{ head_id, dr_cr, amount, narration }`.
    pub lines: Vec<PostingLine>,
}

/// Query parameters for listing vouchers.
#[derive(Debug, Deserialize)]
pub struct ListVouchersQuery {
    /// First date, inclusive.
    pub from: NaiveDate,
    /// Last date, inclusive.
    pub to: NaiveDate,
}

/// POST `/vouchers` - Create and post a voucher.
async fn create_voucher(
    State(state): State<AppState>,
    Json(payload): Json<CreateVoucherRequest>,
) -> Response {
    let repo = VoucherRepository::new((*state.db).clone());
    let input = CreateVoucherInput {
        voucher_type: payload.voucher_type,
        voucher_date: payload.voucher_date,
        narration: payload.narration,
        reference: payload.reference,
        lines: payload.lines,
    };

    match repo.create_voucher(input).await {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/vouchers` - Vouchers dated within a range.
async fn list_vouchers(
    State(state): State<AppState>,
    Query(query): Query<ListVouchersQuery>,
) -> Response {
    let repo = VoucherRepository::new((*state.db).clone());
    match repo.list_vouchers(query.from, query.to).await {
        Ok(vouchers) => (StatusCode::OK, Json(json!({ "vouchers": vouchers }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/vouchers/{voucher_id}` - Voucher with its lines.
async fn get_voucher(State(state): State<AppState>, Path(voucher_id): Path<Uuid>) -> Response {
    let repo = VoucherRepository::new((*state.db).clone());
    match repo.get_voucher(VoucherId::from_uuid(voucher_id)).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}
