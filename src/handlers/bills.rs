//! Bill ledger handlers.
//!
//! The per-person share is a materialized derived value: it is recomputed
//! from the active member count at creation and cost-edit time only. A
//! membership change on its own never retouches existing bills.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{BillDetailResponse, CreateBillRequest, UpdateBillRequest},
    error::AppError,
    models::{Bill, BillCostUpdate, NewBill},
    services::billing,
    AppState,
};

pub async fn list_bills(State(state): State<AppState>) -> Result<Json<Vec<Bill>>, AppError> {
    let bills = state.db.list_bills().await?;
    Ok(Json(bills))
}

pub async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    payload.validate()?;

    if payload.due_date <= Utc::now().date_naive() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Due date must be after today"
        )));
    }

    let active_member_count = state.db.count_active_members().await?;
    let per_person_share = billing::compute_share(payload.total_cost, active_member_count);

    tracing::info!(
        period = %payload.period,
        total_cost = %payload.total_cost,
        active_member_count = active_member_count,
        per_person_share = %per_person_share,
        "Creating bill"
    );

    let bill = state
        .db
        .create_bill(&NewBill {
            period: payload.period,
            total_cost: payload.total_cost,
            per_person_share,
            due_date: payload.due_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(bill)))
}

/// Bill detail: the bill, its payments, and the active members that have
/// not yet settled it.
pub async fn get_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<BillDetailResponse>, AppError> {
    let bill = state
        .db
        .get_bill(bill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill not found")))?;

    let payments = state.db.list_payments_for_bill(bill.id).await?;
    let active_members = state.db.list_active_members().await?;
    let unpaid_members = billing::unpaid_members(bill.per_person_share, active_members, &payments);

    Ok(Json(BillDetailResponse {
        bill,
        payments,
        unpaid_members,
    }))
}

/// Edit total cost and due date, recomputing the share from the current
/// active member count. Closed bills reject edits.
pub async fn update_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(payload): Json<UpdateBillRequest>,
) -> Result<Json<Bill>, AppError> {
    payload.validate()?;

    let bill = state
        .db
        .get_bill(bill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill not found")))?;

    if bill.is_closed() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Bill for period '{}' is closed and can no longer be edited",
            bill.period
        )));
    }

    let active_member_count = state.db.count_active_members().await?;
    let per_person_share = billing::compute_share(payload.total_cost, active_member_count);

    let bill = state
        .db
        .update_bill_costs(
            bill_id,
            &BillCostUpdate {
                total_cost: payload.total_cost,
                per_person_share,
                due_date: payload.due_date,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill not found")))?;

    tracing::info!(
        bill_id = %bill.id,
        total_cost = %bill.total_cost,
        per_person_share = %bill.per_person_share,
        "Bill updated"
    );

    Ok(Json(bill))
}

/// Close the bill to prevent further modifications. Idempotent.
pub async fn close_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<Bill>, AppError> {
    let bill = state
        .db
        .close_bill(bill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill not found")))?;

    Ok(Json(bill))
}

/// Delete a bill. Its payments are removed by cascade.
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.delete_bill(bill_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Bill not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
