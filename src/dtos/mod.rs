//! Request and response types for the administrative API.

use crate::models::{Bill, Member, MemberStatus, Payment};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid regex"));

/// Billing periods are plain `YYYY-MM` strings.
fn validate_period(period: &str) -> Result<(), ValidationError> {
    if PERIOD_RE.is_match(period) {
        Ok(())
    } else {
        let mut err = ValidationError::new("period_format");
        err.message = Some("Period must be in YYYY-MM format".into());
        Err(err)
    }
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Amount must not be negative".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Contact number is required"))]
    pub contact: String,

    pub status: MemberStatus,

    pub join_date: NaiveDate,
}

/// Member edits accept the same fields and rules as creation.
pub type UpdateMemberRequest = CreateMemberRequest;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBillRequest {
    #[validate(custom(function = validate_period))]
    pub period: String,

    #[validate(custom(function = validate_non_negative))]
    pub total_cost: Decimal,

    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBillRequest {
    #[validate(custom(function = validate_non_negative))]
    pub total_cost: Decimal,

    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub member_id: Uuid,

    pub bill_id: Uuid,

    #[validate(custom(function = validate_non_negative))]
    pub amount: Decimal,

    pub payment_date: NaiveDate,
}

/// Payment edits accept the same fields and rules as creation; period and
/// surplus are re-derived from the referenced bill.
pub type UpdatePaymentRequest = CreatePaymentRequest;

/// Bill together with its payments and the active members still owing.
#[derive(Debug, Serialize)]
pub struct BillDetailResponse {
    pub bill: Bill,
    pub payments: Vec<Payment>,
    pub unpaid_members: Vec<Member>,
}
