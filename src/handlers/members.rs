//! Member roster handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{CreateMemberRequest, UpdateMemberRequest},
    error::AppError,
    models::{Member, MemberUpdate, NewMember},
    AppState,
};

pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, AppError> {
    let members = state.db.list_members().await?;
    Ok(Json(members))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    payload.validate()?;

    let member = state
        .db
        .create_member(&NewMember {
            name: payload.name,
            contact: payload.contact,
            status: payload.status,
            join_date: payload.join_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Member>, AppError> {
    let member = state
        .db
        .get_member(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Member not found")))?;

    Ok(Json(member))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<Member>, AppError> {
    payload.validate()?;

    let member = state
        .db
        .update_member(
            member_id,
            &MemberUpdate {
                name: payload.name,
                contact: payload.contact,
                status: payload.status,
                join_date: payload.join_date,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Member not found")))?;

    tracing::info!(member_id = %member.id, status = %member.status, "Member updated");

    Ok(Json(member))
}

/// Delete a member. The member's payments are removed by cascade.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.delete_member(member_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Member not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
