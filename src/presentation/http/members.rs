use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::ErrorResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::access::{self, Action};
use crate::application::ports::member_repository::{MemberFilter, NewMember};
use crate::application::use_cases::members::create_member::{CreateMember, CreateMemberOutcome};
use crate::application::use_cases::members::delete_member::{DeleteMember, DeleteMemberOutcome};
use crate::application::use_cases::members::get_member::GetMember;
use crate::application::use_cases::members::list_members::ListMembers;
use crate::application::use_cases::members::update_member::UpdateMember;
use crate::bootstrap::app_context::AppContext;
use crate::domain::members::{Member, ParticipationStatus};
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::plan_gate::{UpgradeRequiredResponse, upgrade_required};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MemberPayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub household_id: Option<Uuid>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub participation_status: Option<ParticipationStatus>,
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: Uuid,
    pub household_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub participation_status: ParticipationStatus,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMembersQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub household_id: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 200;

pub(crate) fn member_response(m: Member) -> MemberResponse {
    MemberResponse {
        id: m.id,
        household_id: m.household_id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        phone: m.phone,
        birthdate: m.birthdate,
        participation_status: m.participation_status,
        joined_on: m.joined_on,
    }
}

fn payload_to_new(p: MemberPayload) -> NewMember {
    NewMember {
        household_id: p.household_id,
        first_name: p.first_name.trim().to_string(),
        last_name: p.last_name.trim().to_string(),
        email: p
            .email
            .map(|e| e.trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty()),
        phone: p.phone.filter(|s| !s.trim().is_empty()),
        birthdate: p.birthdate,
        participation_status: p.participation_status,
        joined_on: p.joined_on,
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/members", get(list).post(create))
        .route(
            "/members/:id",
            get(get_one).put(update).delete(delete_one),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/members", tag = "Members", params(ListMembersQuery), responses(
    (status = 200, body = [MemberResponse])
))]
pub async fn list(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<ListMembersQuery>,
) -> Result<Json<Vec<MemberResponse>>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let status = match q.status.as_deref() {
        Some(s) => Some(ParticipationStatus::parse(s).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?),
        None => None,
    };
    let filter = MemberFilter {
        status,
        q: q.q.filter(|s| !s.trim().is_empty()),
        household_id: q.household_id,
        limit: q.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE),
        offset: q.offset.unwrap_or(0).max(0),
    };
    let repo = ctx.member_repo();
    let uc = ListMembers {
        repo: repo.as_ref(),
    };
    let members = uc
        .execute(church.id, &filter)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(members.into_iter().map(member_response).collect()))
}

#[utoipa::path(post, path = "/api/members", tag = "Members", request_body = MemberPayload, responses(
    (status = 200, body = MemberResponse),
    (status = 402, body = UpgradeRequiredResponse, description = "Plan member cap reached")
))]
pub async fn create(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<MemberPayload>,
) -> Result<Json<MemberResponse>, ErrorResponse> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN.into());
    }
    let new = payload_to_new(payload);
    if new.first_name.is_empty() || new.last_name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY.into());
    }
    let repo = ctx.member_repo();
    let uc = CreateMember {
        repo: repo.as_ref(),
    };
    match uc
        .execute(church.id, church.plan, &new)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        CreateMemberOutcome::Created(m) => Ok(Json(member_response(m))),
        CreateMemberOutcome::CapExceeded { cap } => {
            let required = access::next_plan(church.plan).unwrap_or(church.plan);
            Err(upgrade_required(
                &format!("member cap of {cap} reached on the {} plan", church.plan.as_str()),
                required,
            ))
        }
    }
}

#[utoipa::path(get, path = "/api/members/{id}", tag = "Members", responses(
    (status = 200, body = MemberResponse),
    (status = 404)
))]
pub async fn get_one(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.member_repo();
    let uc = GetMember {
        repo: repo.as_ref(),
    };
    let member = uc
        .execute(church.id, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(member_response(member)))
}

#[utoipa::path(put, path = "/api/members/{id}", tag = "Members", request_body = MemberPayload, responses(
    (status = 200, body = MemberResponse),
    (status = 404)
))]
pub async fn update(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MemberPayload>,
) -> Result<Json<MemberResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let new = payload_to_new(payload);
    if new.first_name.is_empty() || new.last_name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let repo = ctx.member_repo();
    let uc = UpdateMember {
        repo: repo.as_ref(),
    };
    let member = uc
        .execute(church.id, id, &new)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(member_response(member)))
}

#[utoipa::path(delete, path = "/api/members/{id}", tag = "Members", responses(
    (status = 204),
    (status = 404),
    (status = 409, description = "Member has giving or attendance history")
))]
pub async fn delete_one(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::DeleteMembers) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.member_repo();
    let uc = DeleteMember {
        repo: repo.as_ref(),
    };
    match uc
        .execute(church.id, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        DeleteMemberOutcome::Deleted => Ok(StatusCode::NO_CONTENT),
        DeleteMemberOutcome::NotFound => Err(StatusCode::NOT_FOUND),
        DeleteMemberOutcome::HasHistory => Err(StatusCode::CONFLICT),
    }
}
