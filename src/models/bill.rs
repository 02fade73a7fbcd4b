//! Bill model for one billing period.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bill status. Closing is irreversible; there is no reopen transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Open,
    Closed,
}

impl BillStatus {
    /// Get string representation for database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monthly bill with its derived equal share per active member.
///
/// `per_person_share` is materialized at write time: it is recomputed from
/// the current active member count whenever the bill is created or its
/// total cost is edited, never on membership changes alone.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    /// Billing period in `YYYY-MM` format, unique across all bills.
    pub period: String,
    pub total_cost: Decimal,
    pub per_person_share: Decimal,
    pub status: BillStatus,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Check if the bill has been closed against further edits.
    pub fn is_closed(&self) -> bool {
        self.status == BillStatus::Closed
    }
}

/// Input for creating a new bill. The share is computed by the billing
/// engine before this reaches the data layer.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub period: String,
    pub total_cost: Decimal,
    pub per_person_share: Decimal,
    pub due_date: NaiveDate,
}

/// Input for editing an open bill's cost and due date.
#[derive(Debug, Clone)]
pub struct BillCostUpdate {
    pub total_cost: Decimal,
    pub per_person_share: Decimal,
    pub due_date: NaiveDate,
}
