use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::access::{self, Action};
use crate::application::use_cases::billing::apply_webhook::{
    ApplyWebhook, WebhookEvent, WebhookOutcome,
};
use crate::application::use_cases::billing::get_subscription::GetSubscription;
use crate::application::use_cases::billing::start_checkout::StartCheckout;
use crate::bootstrap::app_context::AppContext;
use crate::domain::tenancy::PlanTier;
use crate::infrastructure::payments::signature;
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::tenant::TenantHost;

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub plan: String,
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutPayload {
    pub plan: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub url: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/billing/subscription", get(subscription))
        .route("/billing/checkout", post(checkout))
        .with_state(ctx)
}

/// The webhook endpoint is mounted outside the tenant-resolved tree; the
/// processor calls the apex domain and events are matched to churches by
/// payload, not Host header.
pub fn webhook_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/billing/webhook", post(webhook))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/billing/subscription", tag = "Billing", responses(
    (status = 200, body = SubscriptionResponse)
))]
pub async fn subscription(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<SubscriptionResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageBilling) {
        return Err(StatusCode::FORBIDDEN);
    }
    let repo = ctx.billing_repo();
    let uc = GetSubscription {
        repo: repo.as_ref(),
    };
    let sub = uc
        .execute(church.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let resp = match sub {
        Some(s) => SubscriptionResponse {
            plan: s.plan.as_str().to_string(),
            status: s.status.as_str().to_string(),
            current_period_end: s.current_period_end,
        },
        // Churches created before billing was wired up have no row; report
        // the tenant's plan with no period.
        None => SubscriptionResponse {
            plan: church.plan.as_str().to_string(),
            status: "active".to_string(),
            current_period_end: None,
        },
    };
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/api/billing/checkout", tag = "Billing", request_body = CheckoutPayload, responses(
    (status = 200, body = CheckoutResponse),
    (status = 503, description = "Payments not configured")
))]
pub async fn checkout(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<Json<CheckoutResponse>, StatusCode> {
    let authed = authenticate(&ctx, &church, bearer).await?;
    if !access::role_allows(authed.role, Action::ManageBilling) {
        return Err(StatusCode::FORBIDDEN);
    }
    let plan = PlanTier::parse(&payload.plan).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let billing_email = ctx
        .user_repo()
        .find_by_id(authed.user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?
        .email;
    let gateway = ctx.payment_gateway();
    let uc = StartCheckout {
        gateway: gateway.as_ref(),
    };
    let session = uc
        .execute(&church, plan, &billing_email)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    Ok(Json(CheckoutResponse { url: session.url }))
}

#[utoipa::path(post, path = "/api/billing/webhook", tag = "Billing", security(()), responses(
    (status = 200, description = "Event processed or acknowledged"),
    (status = 400, description = "Bad signature or payload")
))]
pub async fn webhook(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    let secret = ctx
        .cfg
        .payment_webhook_secret
        .as_deref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    signature::verify(header, &body, secret, Utc::now().timestamp()).map_err(|e| {
        tracing::warn!(error = %e, "webhook_signature_rejected");
        StatusCode::BAD_REQUEST
    })?;

    let event: WebhookEvent =
        serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
    let billing = ctx.billing_repo();
    let tenants = ctx.tenant_repo();
    let uc = ApplyWebhook {
        billing: billing.as_ref(),
        tenants: tenants.as_ref(),
    };
    match uc
        .execute(&event)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        WebhookOutcome::Applied | WebhookOutcome::Ignored | WebhookOutcome::Replayed => {
            Ok(StatusCode::OK)
        }
        // Acknowledged so the processor stops retrying; logged for follow-up.
        WebhookOutcome::UnknownChurch => {
            tracing::warn!(event_id = %event.id, kind = %event.kind, "webhook_unknown_church");
            Ok(StatusCode::OK)
        }
    }
}
