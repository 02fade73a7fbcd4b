//! Member model for the billing roster.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Member status. Only active members are counted when splitting a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    /// Get string representation for database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Roster member.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub status: MemberStatus,
    pub join_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Check if the member participates in bill splitting.
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Input for creating a new member.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub contact: String,
    pub status: MemberStatus,
    pub join_date: NaiveDate,
}

/// Input for updating an existing member.
#[derive(Debug, Clone)]
pub struct MemberUpdate {
    pub name: String,
    pub contact: String,
    pub status: MemberStatus,
    pub join_date: NaiveDate,
}
