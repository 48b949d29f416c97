use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::application::access::{self, Action};
use crate::application::use_cases::reports::attendance_report::AttendanceReport;
use crate::application::use_cases::reports::giving_report::GivingReport;
use crate::application::use_cases::reports::members_report::MembersReport;
use crate::bootstrap::app_context::AppContext;
use crate::domain::members::ParticipationStatus;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MembersReportQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GivingReportQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub fund_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceReportQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

fn csv_download(filename: &str, bytes: Vec<u8>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{filename}\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        header::HeaderValue::from_str(&disposition)
            .unwrap_or(header::HeaderValue::from_static("attachment")),
    );
    (headers, bytes)
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/reports/members.csv", get(members))
        .route("/reports/giving.csv", get(giving))
        .route("/reports/attendance.csv", get(attendance))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/reports/members.csv", tag = "Reports", params(MembersReportQuery), responses(
    (status = 200, content_type = "text/csv", description = "Member roster CSV")
))]
pub async fn members(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<MembersReportQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let status = match q.status.as_deref() {
        Some(s) => Some(ParticipationStatus::parse(s).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?),
        None => None,
    };
    let repo = ctx.member_repo();
    let uc = MembersReport {
        repo: repo.as_ref(),
    };
    let bytes = uc
        .execute(church.id, status)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(csv_download("members.csv", bytes))
}

#[utoipa::path(get, path = "/api/reports/giving.csv", tag = "Reports", params(GivingReportQuery), responses(
    (status = 200, content_type = "text/csv", description = "Giving detail CSV with trailing total")
))]
pub async fn giving(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<GivingReportQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.giving_repo();
    let uc = GivingReport {
        repo: repo.as_ref(),
    };
    let bytes = uc
        .execute(church.id, q.from, q.to, q.fund_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(csv_download("giving.csv", bytes))
}

#[utoipa::path(get, path = "/api/reports/attendance.csv", tag = "Reports", params(AttendanceReportQuery), responses(
    (status = 200, content_type = "text/csv", description = "Attendance headcount CSV")
))]
pub async fn attendance(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<AttendanceReportQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.attendance_repo();
    let uc = AttendanceReport {
        repo: repo.as_ref(),
    };
    let bytes = uc
        .execute(church.id, q.from, q.to)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(csv_download("attendance.csv", bytes))
}
