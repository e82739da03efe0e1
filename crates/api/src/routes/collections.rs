//! Collection routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rentbook_core::ledger::DepositAccount;
use rentbook_db::repositories::{CollectionRepository, SaveCollectionInput, Withholding};
use rentbook_shared::types::{CollectionId, RenterId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Creates the collection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/collections", post(save_collection))
        .route("/collections/{collection_id}", get(get_collection))
        .route("/renters/{renter_id}/collections", get(list_collections))
}

/// Request body for saving a collection.
#[derive(Debug, Deserialize)]
pub struct SaveCollectionRequest {
    /// Paying renter.
    pub renter_id: Uuid,
    /// Date received.
    pub collected_on: NaiveDate,
    /// Gross amount, withholding included.
    pub gross: Decimal,
    /// Withholding; the configured default rates when omitted.
    pub withholding: Option<Withholding>,
    /// cash or bank.
    pub deposit: DepositAccount,
    /// Receipt number; unique when given.
    pub reference: Option<String>,
    /// Free text.
    pub remarks: Option<String>,
}

/// POST `/collections` - Save a collection and settle bills.
async fn save_collection(
    State(state): State<AppState>,
    Json(payload): Json<SaveCollectionRequest>,
) -> Response {
    let repo = CollectionRepository::new((*state.db).clone());
    let withholding = payload.withholding.unwrap_or(Withholding::Rates {
        tds_rate: state.billing.tds_rate,
        vat_rate: state.billing.vat_rate,
    });
    let input = SaveCollectionInput {
        renter_id: RenterId::from_uuid(payload.renter_id),
        collected_on: payload.collected_on,
        gross: payload.gross,
        withholding,
        deposit: payload.deposit,
        reference: payload.reference,
        remarks: payload.remarks,
    };

    match repo.save_collection(input).await {
        Ok(detail) => {
            info!(
                collection_id = %detail.collection.id,
                applied = %detail.collection.applied_amount,
                "Collection saved via API"
            );
            (StatusCode::CREATED, Json(detail)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/collections/{collection_id}` - Collection with its allocations.
async fn get_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
) -> Response {
    let repo = CollectionRepository::new((*state.db).clone());
    match repo
        .get_collection(CollectionId::from_uuid(collection_id))
        .await
    {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/renters/{renter_id}/collections` - A renter's collections.
async fn list_collections(
    State(state): State<AppState>,
    Path(renter_id): Path<Uuid>,
) -> Response {
    let repo = CollectionRepository::new((*state.db).clone());
    match repo.list_collections(RenterId::from_uuid(renter_id)).await {
        Ok(collections) => {
            (StatusCode::OK, Json(json!({ "collections": collections }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
