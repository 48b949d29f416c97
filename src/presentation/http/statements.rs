use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{ErrorResponse, IntoResponse},
    routing::{get, post},
};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::access::{self, Action, PlanFeature};
use crate::application::use_cases::statements::generate_statements::GenerateStatements;
use crate::application::use_cases::statements::list_statements::ListStatements;
use crate::application::use_cases::statements::render_statement_pdf::RenderStatementPdf;
use crate::bootstrap::app_context::AppContext;
use crate::domain::giving::GivingStatement;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::plan_gate::{UpgradeRequiredResponse, upgrade_required};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, IntoParams)]
pub struct YearQuery {
    /// Defaults to the previous calendar year.
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatementResponse {
    pub id: Uuid,
    pub household_id: Uuid,
    pub household_name: String,
    pub year: i32,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub year: i32,
    pub households: usize,
    #[schema(value_type = String)]
    pub total: Decimal,
}

fn statement_response(s: GivingStatement) -> StatementResponse {
    StatementResponse {
        id: s.id,
        household_id: s.household_id,
        household_name: s.household_name,
        year: s.year,
        total_amount: s.total_amount,
        generated_at: s.generated_at,
    }
}

fn default_year() -> i32 {
    Utc::now().year() - 1
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/statements", get(list))
        .route("/statements/generate", post(generate))
        .route("/statements/:household_id/pdf", get(download_pdf))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/statements", tag = "Statements", params(YearQuery), responses(
    (status = 200, body = [StatementResponse])
))]
pub async fn list(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<YearQuery>,
) -> Result<Json<Vec<StatementResponse>>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.statement_repo();
    let uc = ListStatements {
        repo: repo.as_ref(),
    };
    let rows = uc
        .execute(church.id, q.year.unwrap_or_else(default_year))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(statement_response).collect()))
}

#[utoipa::path(post, path = "/api/statements/generate", tag = "Statements", params(YearQuery), responses(
    (status = 200, body = GenerateResponse),
    (status = 402, body = UpgradeRequiredResponse, description = "Plan does not include statements")
))]
pub async fn generate(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<YearQuery>,
) -> Result<Json<GenerateResponse>, ErrorResponse> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::GenerateStatements) {
        return Err(StatusCode::FORBIDDEN.into());
    }
    if !access::plan_allows(church.plan, PlanFeature::GivingStatements) {
        return Err(upgrade_required(
            "giving statements are not included in your plan",
            access::feature_minimum(PlanFeature::GivingStatements),
        ));
    }
    let giving = ctx.giving_repo();
    let statements = ctx.statement_repo();
    let uc = GenerateStatements {
        giving: giving.as_ref(),
        statements: statements.as_ref(),
    };
    let summary = uc
        .execute(church.id, q.year.unwrap_or_else(default_year))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(GenerateResponse {
        year: summary.year,
        households: summary.households,
        total: summary.total,
    }))
}

#[utoipa::path(get, path = "/api/statements/{household_id}/pdf", tag = "Statements", params(YearQuery), responses(
    (status = 200, content_type = "application/pdf", description = "Statement PDF"),
    (status = 402, body = UpgradeRequiredResponse, description = "Plan does not include statements"),
    (status = 404)
))]
pub async fn download_pdf(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Path(household_id): Path<Uuid>,
    Query(q): Query<YearQuery>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::GenerateStatements) {
        return Err(StatusCode::FORBIDDEN.into());
    }
    if !access::plan_allows(church.plan, PlanFeature::GivingStatements) {
        return Err(upgrade_required(
            "giving statements are not included in your plan",
            access::feature_minimum(PlanFeature::GivingStatements),
        ));
    }
    let giving = ctx.giving_repo();
    let households = ctx.household_repo();
    let uc = RenderStatementPdf {
        giving: giving.as_ref(),
        households: households.as_ref(),
    };
    let pdf = uc
        .execute(&church, household_id, q.year.unwrap_or_else(default_year))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/pdf"),
    );
    let disposition = format!("attachment; filename=\"{}\"", pdf.filename);
    headers.insert(
        header::CONTENT_DISPOSITION,
        header::HeaderValue::from_str(&disposition)
            .unwrap_or(header::HeaderValue::from_static("attachment")),
    );
    Ok((headers, pdf.bytes))
}
