//! Dashboard handler: current-month summary.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::services::billing::{self, DashboardSummary};
use crate::{error::AppError, AppState};

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let current_period = Utc::now().format("%Y-%m").to_string();

    let bill = state.db.get_bill_by_period(&current_period).await?;
    let active_members = state.db.list_active_members().await?;

    let payments = match &bill {
        Some(bill) => state.db.list_payments_for_bill(bill.id).await?,
        None => Vec::new(),
    };

    let summary = billing::summarize(&current_period, bill.as_ref(), &payments, active_members);

    Ok(Json(summary))
}
