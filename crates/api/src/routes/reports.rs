//! Report routes: trial balance, ledger verification, tenant statements
//! and document journals.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use rentbook_core::ledger::DocumentRef;
use rentbook_db::repositories::{LedgerRepository, TenantRepository};
use rentbook_shared::types::{BillId, CollectionId, RenterId, VoucherId};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(get_trial_balance))
        .route("/reports/verify", get(verify_ledger))
        .route("/reports/journal/{kind}/{document_id}", get(get_document_journal))
        .route("/renters/{renter_id}/statement", get(get_statement))
}

/// Query parameters for the trial balance.
#[derive(Debug, Deserialize)]
pub struct TrialBalanceQuery {
    /// Balances as of this date; live balances when omitted.
    pub as_of: Option<NaiveDate>,
}

/// Query parameters for a tenant statement.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// First date, inclusive.
    pub from: NaiveDate,
    /// Last date, inclusive.
    pub to: NaiveDate,
}

/// GET `/reports/trial-balance` - Trial balance.
async fn get_trial_balance(
    State(state): State<AppState>,
    Query(query): Query<TrialBalanceQuery>,
) -> Response {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo.get_trial_balance(query.as_of).await {
        Ok(trial_balance) => (StatusCode::OK, Json(trial_balance)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/reports/verify` - Reconcile stored balances against the journal.
async fn verify_ledger(State(state): State<AppState>) -> Response {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo.verify().await {
        Ok(report) => {
            if !report.is_consistent() {
                warn!(mismatches = report.mismatches.len(), "Ledger verification failed");
            }
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/reports/journal/{kind}/{document_id}` - Journal rows of a bill,
/// collection or voucher.
async fn get_document_journal(
    State(state): State<AppState>,
    Path((kind, document_id)): Path<(String, Uuid)>,
) -> Response {
    let document = match kind.as_str() {
        "bill" => DocumentRef::Bill(BillId::from_uuid(document_id)),
        "collection" => DocumentRef::Collection(CollectionId::from_uuid(document_id)),
        "voucher" => DocumentRef::Voucher(VoucherId::from_uuid(document_id)),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "VALIDATION_ERROR",
                    "message": format!("Unknown document kind '{kind}', expected bill, collection or voucher")
                })),
            )
                .into_response();
        }
    };

    let repo = LedgerRepository::new((*state.db).clone());
    match repo.journal_for_document(document).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(json!({ "document": document, "entries": rows })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/renters/{renter_id}/statement` - Tenant statement for a range.
async fn get_statement(
    State(state): State<AppState>,
    Path(renter_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> Response {
    let repo = TenantRepository::new((*state.db).clone());
    match repo
        .statement(RenterId::from_uuid(renter_id), query.from, query.to)
        .await
    {
        Ok(statement) => (StatusCode::OK, Json(statement)).into_response(),
        Err(e) => error_response(e),
    }
}
