use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::access::{self, Action};
use crate::application::ports::giving_repository::{GivingFilter, NewContribution};
use crate::application::use_cases::giving::create_fund::CreateFund;
use crate::application::use_cases::giving::list_contributions::ListContributions;
use crate::application::use_cases::giving::list_funds::ListFunds;
use crate::application::use_cases::giving::record_contribution::{
    RecordContribution, RecordContributionOutcome,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::giving::{Contribution, Fund, GivingMethod};
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct FundPayload {
    pub name: String,
    #[serde(default = "default_deductible")]
    pub tax_deductible: bool,
}

fn default_deductible() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FundResponse {
    pub id: Uuid,
    pub name: String,
    pub tax_deductible: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ContributionPayload {
    pub member_id: Uuid,
    pub fund_id: Uuid,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub received_on: NaiveDate,
    pub method: GivingMethod,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContributionResponse {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub fund_id: Uuid,
    pub fund_name: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub received_on: NaiveDate,
    pub method: GivingMethod,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContributionsQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub fund_id: Option<Uuid>,
    #[serde(default)]
    pub member_id: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContributionListResponse {
    pub contributions: Vec<ContributionResponse>,
    /// Sum over the whole filtered range, not just this page.
    #[schema(value_type = String)]
    pub total: Decimal,
}

const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 200;

fn fund_response(f: Fund) -> FundResponse {
    FundResponse {
        id: f.id,
        name: f.name,
        tax_deductible: f.tax_deductible,
    }
}

fn contribution_response(c: Contribution) -> ContributionResponse {
    ContributionResponse {
        id: c.id,
        member_id: c.member_id,
        member_name: c.member_name,
        fund_id: c.fund_id,
        fund_name: c.fund_name,
        amount: c.amount,
        received_on: c.received_on,
        method: c.method,
        note: c.note,
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/funds", get(list_funds).post(create_fund))
        .route("/contributions", get(list).post(record))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/funds", tag = "Giving", responses(
    (status = 200, body = [FundResponse])
))]
pub async fn list_funds(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<Vec<FundResponse>>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.giving_repo();
    let uc = ListFunds {
        repo: repo.as_ref(),
    };
    let funds = uc
        .execute(church.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(funds.into_iter().map(fund_response).collect()))
}

#[utoipa::path(post, path = "/api/funds", tag = "Giving", request_body = FundPayload, responses(
    (status = 200, body = FundResponse)
))]
pub async fn create_fund(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<FundPayload>,
) -> Result<Json<FundResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageFunds) {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let repo = ctx.giving_repo();
    let uc = CreateFund {
        repo: repo.as_ref(),
    };
    let fund = uc
        .execute(church.id, &payload.name, payload.tax_deductible)
        .await
        .map_err(|_| StatusCode::CONFLICT)?;
    Ok(Json(fund_response(fund)))
}

#[utoipa::path(post, path = "/api/contributions", tag = "Giving", request_body = ContributionPayload, responses(
    (status = 200, body = ContributionResponse),
    (status = 404, description = "Unknown member or fund"),
    (status = 422, description = "Amount not positive")
))]
pub async fn record(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<ContributionPayload>,
) -> Result<Json<ContributionResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let giving = ctx.giving_repo();
    let members = ctx.member_repo();
    let uc = RecordContribution {
        giving: giving.as_ref(),
        members: members.as_ref(),
    };
    let new = NewContribution {
        member_id: payload.member_id,
        fund_id: payload.fund_id,
        amount: payload.amount,
        received_on: payload.received_on,
        method: payload.method,
        note: payload.note.filter(|s| !s.trim().is_empty()),
    };
    match uc
        .execute(church.id, &new)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        RecordContributionOutcome::Recorded(c) => Ok(Json(contribution_response(c))),
        RecordContributionOutcome::MemberNotFound | RecordContributionOutcome::FundNotFound => {
            Err(StatusCode::NOT_FOUND)
        }
        RecordContributionOutcome::AmountNotPositive => Err(StatusCode::UNPROCESSABLE_ENTITY),
    }
}

#[utoipa::path(get, path = "/api/contributions", tag = "Giving", params(ContributionsQuery), responses(
    (status = 200, body = ContributionListResponse)
))]
pub async fn list(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<ContributionsQuery>,
) -> Result<Json<ContributionListResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let filter = GivingFilter {
        from: q.from,
        to: q.to,
        fund_id: q.fund_id,
        member_id: q.member_id,
        limit: q.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE),
        offset: q.offset.unwrap_or(0).max(0),
    };
    let repo = ctx.giving_repo();
    let uc = ListContributions {
        repo: repo.as_ref(),
    };
    let (rows, total) = uc
        .execute(church.id, &filter)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(ContributionListResponse {
        contributions: rows.into_iter().map(contribution_response).collect(),
        total,
    }))
}
