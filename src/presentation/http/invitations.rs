use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::{self, Action};
use crate::application::ports::invitation_repository::InvitationRow;
use crate::application::use_cases::invitations::accept_invitation::{
    AcceptInvitation, AcceptOutcome,
};
use crate::application::use_cases::invitations::create_invitation::{
    CreateInvitation, CreateInvitationOutcome,
};
use crate::application::use_cases::invitations::list_invitations::ListInvitations;
use crate::bootstrap::app_context::AppContext;
use crate::domain::tenancy::Role;
use crate::presentation::http::auth::{Bearer, UserResponse, authenticate, user_response};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvitePayload {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvitationResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptPayload {
    pub token: String,
    pub name: String,
    pub password: String,
}

fn invitation_response(row: InvitationRow) -> InvitationResponse {
    InvitationResponse {
        id: row.id,
        email: row.email,
        role: row.role,
        expires_at: row.expires_at,
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/invitations", get(list).post(create))
        .route("/invitations/accept", post(accept))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/invitations", tag = "Invitations", responses(
    (status = 200, body = [InvitationResponse])
))]
pub async fn list(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<Vec<InvitationResponse>>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageInvitations) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.invitation_repo();
    let uc = ListInvitations {
        repo: repo.as_ref(),
    };
    let rows = uc
        .execute(church.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(invitation_response).collect()))
}

#[utoipa::path(post, path = "/api/invitations", tag = "Invitations", request_body = InvitePayload, responses(
    (status = 200, body = InvitationResponse),
    (status = 403, description = "Role above the inviter's own")
))]
pub async fn create(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<InvitePayload>,
) -> Result<Json<InvitationResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageInvitations) {
        return Err(StatusCode::FORBIDDEN);
    }
    let role = Role::parse(&payload.role).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    if payload.email.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let invitations = ctx.invitation_repo();
    let mail = ctx.mail_gateway();
    let uc = CreateInvitation {
        invitations: invitations.as_ref(),
        mail: mail.as_ref(),
    };
    match uc
        .execute(
            &church,
            &ctx.cfg.base_domain,
            authed.role,
            &payload.email,
            role,
        )
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        CreateInvitationOutcome::Created(row) => Ok(Json(invitation_response(row))),
        CreateInvitationOutcome::RoleTooHigh => Err(StatusCode::FORBIDDEN),
    }
}

#[utoipa::path(post, path = "/api/invitations/accept", tag = "Invitations", request_body = AcceptPayload, security(()), responses(
    (status = 200, body = UserResponse),
    (status = 404, description = "Unknown token"),
    (status = 409, description = "A user with the invited email already exists"),
    (status = 410, description = "Expired or already used")
))]
pub async fn accept(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    Json(payload): Json<AcceptPayload>,
) -> Result<Json<UserResponse>, StatusCode> {
    let invitations = ctx.invitation_repo();
    let users = ctx.user_repo();
    let uc = AcceptInvitation {
        invitations: invitations.as_ref(),
        users: users.as_ref(),
    };
    match uc
        .execute(church.id, &payload.token, &payload.name, &payload.password)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        AcceptOutcome::Created(user) => Ok(Json(user_response(&user))),
        AcceptOutcome::NotFound => Err(StatusCode::NOT_FOUND),
        AcceptOutcome::EmailTaken => Err(StatusCode::CONFLICT),
        AcceptOutcome::Expired | AcceptOutcome::AlreadyUsed => Err(StatusCode::GONE),
    }
}
