use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::ErrorResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::access::{self, Action, PlanFeature};
use crate::application::services::csv_import::{ImportFileError, MAX_IMPORT_BYTES, RowError};
use crate::application::use_cases::imports::ImportOutcome;
use crate::application::use_cases::imports::import_contributions::ImportContributions;
use crate::application::use_cases::imports::import_members::ImportMembers;
use crate::bootstrap::app_context::AppContext;
use crate::domain::tenancy::PlanTier;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::plan_gate::{UpgradeRequiredResponse, upgrade_required};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ImportQuery {
    /// When true, valid rows commit even if others fail. Default is
    /// all-or-nothing.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub imported: u64,
    pub total_rows: usize,
    pub errors: Vec<RowError>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/imports/members", post(import_members))
        .route("/imports/contributions", post(import_contributions))
        .with_state(ctx)
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            if bytes.len() > MAX_IMPORT_BYTES {
                return Err(StatusCode::PAYLOAD_TOO_LARGE);
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(StatusCode::BAD_REQUEST)
}

fn file_error_status(e: &ImportFileError) -> StatusCode {
    match e {
        ImportFileError::TooLarge | ImportFileError::TooManyRows => StatusCode::PAYLOAD_TOO_LARGE,
        ImportFileError::MissingColumns(_) | ImportFileError::Malformed(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn outcome_response(
    outcome: ImportOutcome,
    plan: PlanTier,
) -> Result<(StatusCode, Json<ImportResponse>), ErrorResponse> {
    match outcome {
        ImportOutcome::Committed {
            imported,
            total_rows,
            errors,
        } => Ok((
            StatusCode::OK,
            Json(ImportResponse {
                imported,
                total_rows,
                errors,
            }),
        )),
        ImportOutcome::Rejected { total_rows, errors } => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ImportResponse {
                imported: 0,
                total_rows,
                errors,
            }),
        )),
        ImportOutcome::CapExceeded { cap } => {
            let required = access::next_plan(plan).unwrap_or(plan);
            Err(upgrade_required(
                &format!("member cap of {cap} reached on the {} plan", plan.as_str()),
                required,
            ))
        }
        ImportOutcome::FileError(e) => Err(file_error_status(&e).into()),
    }
}

#[utoipa::path(post, path = "/api/imports/members", tag = "Imports", params(ImportQuery), responses(
    (status = 200, body = ImportResponse),
    (status = 402, body = UpgradeRequiredResponse, description = "Plan gate or member cap"),
    (status = 422, body = ImportResponse, description = "Row errors, nothing committed")
))]
pub async fn import_members(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ErrorResponse> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ImportData) {
        return Err(StatusCode::FORBIDDEN.into());
    }
    if !access::plan_allows(church.plan, PlanFeature::CsvImport) {
        return Err(upgrade_required(
            "csv import is not included in your plan",
            access::feature_minimum(PlanFeature::CsvImport),
        ));
    }
    let bytes = read_file_field(&mut multipart).await?;
    let imports = ctx.import_repo();
    let members = ctx.member_repo();
    let uc = ImportMembers {
        imports: imports.as_ref(),
        members: members.as_ref(),
    };
    let outcome = uc
        .execute(church.id, church.plan, &bytes, q.partial)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    outcome_response(outcome, church.plan)
}

#[utoipa::path(post, path = "/api/imports/contributions", tag = "Imports", params(ImportQuery), responses(
    (status = 200, body = ImportResponse),
    (status = 402, body = UpgradeRequiredResponse, description = "Plan gate"),
    (status = 422, body = ImportResponse, description = "Row errors, nothing committed")
))]
pub async fn import_contributions(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ErrorResponse> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ImportData) {
        return Err(StatusCode::FORBIDDEN.into());
    }
    if !access::plan_allows(church.plan, PlanFeature::CsvImport) {
        return Err(upgrade_required(
            "csv import is not included in your plan",
            access::feature_minimum(PlanFeature::CsvImport),
        ));
    }
    let bytes = read_file_field(&mut multipart).await?;
    let imports = ctx.import_repo();
    let members = ctx.member_repo();
    let uc = ImportContributions {
        imports: imports.as_ref(),
        members: members.as_ref(),
    };
    let outcome = uc
        .execute(church.id, &bytes, q.partial)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    outcome_response(outcome, church.plan)
}
