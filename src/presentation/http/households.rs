use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::{self, Action};
use crate::application::ports::household_repository::NewHousehold;
use crate::application::use_cases::households::create_household::CreateHousehold;
use crate::application::use_cases::households::delete_household::DeleteHousehold;
use crate::application::use_cases::households::get_household::GetHousehold;
use crate::application::use_cases::households::list_households::ListHouseholds;
use crate::application::use_cases::households::update_household::UpdateHousehold;
use crate::bootstrap::app_context::AppContext;
use crate::domain::households::Household;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::members::{MemberResponse, member_response};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HouseholdPayload {
    pub name: String,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HouseholdResponse {
    pub id: Uuid,
    pub name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HouseholdListItem {
    #[serde(flatten)]
    pub household: HouseholdResponse,
    pub member_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HouseholdDetail {
    #[serde(flatten)]
    pub household: HouseholdResponse,
    pub members: Vec<MemberResponse>,
}

fn household_response(h: Household) -> HouseholdResponse {
    HouseholdResponse {
        id: h.id,
        name: h.name,
        address_line1: h.address_line1,
        address_line2: h.address_line2,
        city: h.city,
        state: h.state,
        postal_code: h.postal_code,
    }
}

fn payload_to_new(p: HouseholdPayload) -> NewHousehold {
    NewHousehold {
        name: p.name.trim().to_string(),
        address_line1: p.address_line1.filter(|s| !s.trim().is_empty()),
        address_line2: p.address_line2.filter(|s| !s.trim().is_empty()),
        city: p.city.filter(|s| !s.trim().is_empty()),
        state: p.state.filter(|s| !s.trim().is_empty()),
        postal_code: p.postal_code.filter(|s| !s.trim().is_empty()),
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/households", get(list).post(create))
        .route(
            "/households/:id",
            get(get_one).put(update).delete(delete_one),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/households", tag = "Households", responses(
    (status = 200, body = [HouseholdListItem])
))]
pub async fn list(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<Vec<HouseholdListItem>>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.household_repo();
    let uc = ListHouseholds {
        repo: repo.as_ref(),
    };
    let rows = uc
        .execute(church.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(
        rows.into_iter()
            .map(|r| HouseholdListItem {
                household: household_response(r.household),
                member_count: r.member_count,
            })
            .collect(),
    ))
}

#[utoipa::path(post, path = "/api/households", tag = "Households", request_body = HouseholdPayload, responses(
    (status = 200, body = HouseholdResponse)
))]
pub async fn create(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<HouseholdPayload>,
) -> Result<Json<HouseholdResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let new = payload_to_new(payload);
    if new.name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let repo = ctx.household_repo();
    let uc = CreateHousehold {
        repo: repo.as_ref(),
    };
    let household = uc
        .execute(church.id, &new)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(household_response(household)))
}

#[utoipa::path(get, path = "/api/households/{id}", tag = "Households", responses(
    (status = 200, body = HouseholdDetail),
    (status = 404)
))]
pub async fn get_one(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> Result<Json<HouseholdDetail>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.household_repo();
    let uc = GetHousehold {
        repo: repo.as_ref(),
    };
    let (household, members) = uc
        .execute(church.id, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(HouseholdDetail {
        household: household_response(household),
        members: members.into_iter().map(member_response).collect(),
    }))
}

#[utoipa::path(put, path = "/api/households/{id}", tag = "Households", request_body = HouseholdPayload, responses(
    (status = 200, body = HouseholdResponse),
    (status = 404)
))]
pub async fn update(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HouseholdPayload>,
) -> Result<Json<HouseholdResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let new = payload_to_new(payload);
    if new.name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let repo = ctx.household_repo();
    let uc = UpdateHousehold {
        repo: repo.as_ref(),
    };
    let household = uc
        .execute(church.id, id, &new)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(household_response(household)))
}

#[utoipa::path(delete, path = "/api/households/{id}", tag = "Households", responses(
    (status = 204),
    (status = 404)
))]
pub async fn delete_one(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.household_repo();
    let uc = DeleteHousehold {
        repo: repo.as_ref(),
    };
    if uc
        .execute(church.id, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
