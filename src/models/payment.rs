//! Payment model: one recorded payment by a member against a bill.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Recorded payment.
///
/// `period` is copied from the referenced bill at recording time and
/// `surplus` holds the amount by which this single payment exceeded the
/// bill's per-person share, both re-derived on edit.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub member_id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub period: String,
    pub payment_date: NaiveDate,
    pub surplus: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a payment, with the derived fields already computed
/// by the billing engine.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub member_id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub period: String,
    pub payment_date: NaiveDate,
    pub surplus: Decimal,
}

/// Input for editing a recorded payment.
#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub member_id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub period: String,
    pub payment_date: NaiveDate,
    pub surplus: Decimal,
}
