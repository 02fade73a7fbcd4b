//! Payment ledger handlers.
//!
//! Each payment stores the bill's period and its own surplus as derived
//! values, recomputed against the bill's share at record and edit time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{CreatePaymentRequest, UpdatePaymentRequest},
    error::AppError,
    models::{Bill, NewPayment, Payment, PaymentUpdate},
    services::billing,
    AppState,
};

pub async fn list_payments(State(state): State<AppState>) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = state.db.list_payments().await?;
    Ok(Json(payments))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    payload.validate()?;

    let bill = resolve_references(&state, payload.member_id, payload.bill_id).await?;
    let classification = billing::classify_payment(payload.amount, bill.per_person_share);

    tracing::info!(
        member_id = %payload.member_id,
        bill_id = %bill.id,
        amount = %payload.amount,
        is_settled = classification.is_settled,
        surplus = %classification.surplus,
        "Recording payment"
    );

    let payment = state
        .db
        .create_payment(&NewPayment {
            member_id: payload.member_id,
            bill_id: payload.bill_id,
            amount: payload.amount,
            period: bill.period,
            payment_date: payload.payment_date,
            surplus: classification.surplus,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    let payment = state
        .db
        .get_payment(payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    Ok(Json(payment))
}

/// Edit a payment. Period and surplus are re-derived from the referenced
/// bill's current share, which may differ from the one at recording time.
pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    payload.validate()?;

    let bill = resolve_references(&state, payload.member_id, payload.bill_id).await?;
    let classification = billing::classify_payment(payload.amount, bill.per_person_share);

    let payment = state
        .db
        .update_payment(
            payment_id,
            &PaymentUpdate {
                member_id: payload.member_id,
                bill_id: payload.bill_id,
                amount: payload.amount,
                period: bill.period,
                payment_date: payload.payment_date,
                surplus: classification.surplus,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    tracing::info!(payment_id = %payment.id, surplus = %payment.surplus, "Payment updated");

    Ok(Json(payment))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.delete_payment(payment_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Payment not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Verify the referenced member and bill exist, returning the bill whose
/// share the payment is classified against.
async fn resolve_references(
    state: &AppState,
    member_id: Uuid,
    bill_id: Uuid,
) -> Result<Bill, AppError> {
    state
        .db
        .get_member(member_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("The selected member is not valid")))?;

    state
        .db
        .get_bill(bill_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("The selected bill is not valid")))
}
