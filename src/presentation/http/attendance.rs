use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::access::{self, Action};
use crate::application::ports::attendance_repository::AttendanceFilter;
use crate::application::use_cases::attendance::create_service::CreateService;
use crate::application::use_cases::attendance::list_attendance::ListAttendance;
use crate::application::use_cases::attendance::list_services::ListServices;
use crate::application::use_cases::attendance::record_attendance::{
    RecordAttendance, RecordAttendanceOutcome,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::attendance::Service;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::tenant::TenantHost;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ServicePayload {
    pub name: String,
    #[serde(default)]
    pub starts_at: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub starts_at: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordAttendancePayload {
    pub service_id: Uuid,
    pub attended_on: NaiveDate,
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordAttendanceResponse {
    /// Newly recorded rows; members already marked for that date are skipped.
    pub recorded: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    #[serde(default)]
    pub service_id: Option<Uuid>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceRecordResponse {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub member_id: Uuid,
    pub member_name: String,
    pub attended_on: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HeadcountResponse {
    pub attended_on: NaiveDate,
    pub service_name: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceRecordResponse>,
    pub headcounts: Vec<HeadcountResponse>,
}

fn service_response(s: Service) -> ServiceResponse {
    ServiceResponse {
        id: s.id,
        name: s.name,
        starts_at: s.starts_at,
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/attendance", get(list).post(record))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/services", tag = "Attendance", responses(
    (status = 200, body = [ServiceResponse])
))]
pub async fn list_services(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<Vec<ServiceResponse>>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.attendance_repo();
    let uc = ListServices {
        repo: repo.as_ref(),
    };
    let services = uc
        .execute(church.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(services.into_iter().map(service_response).collect()))
}

#[utoipa::path(post, path = "/api/services", tag = "Attendance", request_body = ServicePayload, responses(
    (status = 200, body = ServiceResponse)
))]
pub async fn create_service(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<ServiceResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    if payload.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let repo = ctx.attendance_repo();
    let uc = CreateService {
        repo: repo.as_ref(),
    };
    let service = uc
        .execute(church.id, &payload.name, payload.starts_at.as_deref())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(service_response(service)))
}

#[utoipa::path(post, path = "/api/attendance", tag = "Attendance", request_body = RecordAttendancePayload, responses(
    (status = 200, body = RecordAttendanceResponse),
    (status = 404, description = "Unknown service")
))]
pub async fn record(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<RecordAttendancePayload>,
) -> Result<Json<RecordAttendanceResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.attendance_repo();
    let uc = RecordAttendance {
        repo: repo.as_ref(),
    };
    match uc
        .execute(
            church.id,
            payload.service_id,
            payload.attended_on,
            &payload.member_ids,
        )
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        RecordAttendanceOutcome::Recorded { recorded } => {
            Ok(Json(RecordAttendanceResponse { recorded }))
        }
        RecordAttendanceOutcome::ServiceNotFound => Err(StatusCode::NOT_FOUND),
    }
}

#[utoipa::path(get, path = "/api/attendance", tag = "Attendance", params(AttendanceQuery), responses(
    (status = 200, body = AttendanceListResponse)
))]
pub async fn list(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Query(q): Query<AttendanceQuery>,
) -> Result<Json<AttendanceListResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ViewRecords) {
        return Err(StatusCode::FORBIDDEN);
    }
    let filter = AttendanceFilter {
        service_id: q.service_id,
        from: q.from,
        to: q.to,
    };
    let repo = ctx.attendance_repo();
    let uc = ListAttendance {
        repo: repo.as_ref(),
    };
    let (records, headcounts) = uc
        .execute(church.id, &filter)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(AttendanceListResponse {
        records: records
            .into_iter()
            .map(|r| AttendanceRecordResponse {
                id: r.id,
                service_id: r.service_id,
                service_name: r.service_name,
                member_id: r.member_id,
                member_name: r.member_name,
                attended_on: r.attended_on,
            })
            .collect(),
        headcounts: headcounts
            .into_iter()
            .map(|h| HeadcountResponse {
                attended_on: h.attended_on,
                service_name: h.service_name,
                count: h.count,
            })
            .collect(),
    }))
}
