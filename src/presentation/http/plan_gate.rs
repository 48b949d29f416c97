use axum::Json;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::tenancy::PlanTier;

/// Body of every 402: what was refused and the cheapest plan that lifts the
/// restriction.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpgradeRequiredResponse {
    pub error: String,
    pub required_plan: String,
}

pub(crate) fn upgrade_required(error: &str, required_plan: PlanTier) -> ErrorResponse {
    (
        StatusCode::PAYMENT_REQUIRED,
        Json(UpgradeRequiredResponse {
            error: error.to_string(),
            required_plan: required_plan.as_str().to_string(),
        }),
    )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn the_body_names_the_plan_to_upgrade_to() {
        let err = upgrade_required("csv import is not included in your plan", PlanTier::Standard);
        let response = Result::<(), ErrorResponse>::Err(err).into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }
}
