use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

fn health_response(db_ok: bool) -> HealthResponse {
    HealthResponse {
        status: if db_ok { "ok" } else { "degraded" },
        database: if db_ok { "up" } else { "down" },
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    security(()),
    responses((status = 200, body = HealthResponse))
)]
pub async fn health(State(pool): State<PgPool>) -> Json<HealthResponse> {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await
        .is_ok();
    Json(health_response(db_ok))
}

pub fn routes(pool: PgPool) -> Router {
    Router::new().route("/health", get(health)).with_state(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_reachable_database_reports_ok() {
        let r = health_response(true);
        assert_eq!(r.status, "ok");
        assert_eq!(r.database, "up");
    }

    #[test]
    fn an_unreachable_database_degrades_the_status() {
        let r = health_response(false);
        assert_eq!(r.status, "degraded");
        assert_eq!(r.database, "down");
    }
}
