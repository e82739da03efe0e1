//! Heads of account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rentbook_core::ledger::HeadType;
use rentbook_db::repositories::{CreateHeadInput, HeadFilter, HeadRepository, LedgerRepository};
use rentbook_shared::types::HeadId;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::error_response};

/// Creates the head of account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/heads", get(list_heads).post(create_head))
        .route("/heads/{head_id}/deactivate", post(deactivate_head))
        .route("/heads/{head_id}/balance", get(get_head_balance))
}

/// Query parameters for listing heads.
#[derive(Debug, Deserialize)]
pub struct ListHeadsQuery {
    /// Filter by head type.
    #[serde(rename = "type")]
    pub head_type: Option<HeadType>,
    /// Filter by active status.
    pub active: Option<bool>,
}

/// Request body for creating a head.
#[derive(Debug, Deserialize)]
pub struct CreateHeadRequest {
    /// Unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// asset, liability, equity, revenue or expense.
    #[serde(rename = "type")]
    pub head_type: HeadType,
    /// Optional description.
    pub description: Option<String>,
}

/// Query parameters for balance reads.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Balance as of this date; live balance when omitted.
    pub as_of: Option<NaiveDate>,
}

/// GET `/heads` - List heads of account.
async fn list_heads(State(state): State<AppState>, Query(query): Query<ListHeadsQuery>) -> Response {
    let repo = HeadRepository::new((*state.db).clone());
    let filter = HeadFilter {
        head_type: query.head_type,
        is_active: query.active,
    };

    match repo.list(filter).await {
        Ok(heads) => (StatusCode::OK, Json(json!({ "heads": heads }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/heads` - Create a head of account.
async fn create_head(
    State(state): State<AppState>,
    Json(payload): Json<CreateHeadRequest>,
) -> Response {
    let repo = HeadRepository::new((*state.db).clone());
    let input = CreateHeadInput {
        code: payload.code,
        name: payload.name,
        head_type: payload.head_type,
        description: payload.description,
    };

    match repo.create(input).await {
        Ok(head) => {
            info!(head_id = %head.id, code = %head.code, "Head created via API");
            (StatusCode::CREATED, Json(head)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST `/heads/{head_id}/deactivate` - Stop further postings to a head.
async fn deactivate_head(State(state): State<AppState>, Path(head_id): Path<Uuid>) -> Response {
    let repo = HeadRepository::new((*state.db).clone());
    match repo.deactivate(HeadId::from_uuid(head_id)).await {
        Ok(head) => (StatusCode::OK, Json(head)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/heads/{head_id}/balance` - Live or historical balance.
async fn get_head_balance(
    State(state): State<AppState>,
    Path(head_id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> Response {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo
        .get_ledger_balance(HeadId::from_uuid(head_id), query.as_of)
        .await
    {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "head_id": head_id,
                "as_of": query.as_of,
                "amount": balance.amount,
                "dr_cr": balance.dr_cr
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
