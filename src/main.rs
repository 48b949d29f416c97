use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, MatchedPath};
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use parishbook::application::ports::mail_gateway::MailGateway;
use parishbook::application::ports::payment_gateway::PaymentGateway;
use parishbook::bootstrap::app_context::{AppContext, AppServices};
use parishbook::bootstrap::config::Config;
use parishbook::infrastructure::db::repositories as repos;
use parishbook::infrastructure::email::{HttpMailGateway, LogMailGateway};
use parishbook::infrastructure::payments::{DisabledPaymentGateway, HostedCheckoutGateway};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            parishbook::presentation::http::auth::register,
            parishbook::presentation::http::auth::login,
            parishbook::presentation::http::auth::logout,
            parishbook::presentation::http::auth::me,
            parishbook::presentation::http::invitations::list,
            parishbook::presentation::http::invitations::create,
            parishbook::presentation::http::invitations::accept,
            parishbook::presentation::http::members::list,
            parishbook::presentation::http::members::create,
            parishbook::presentation::http::members::get_one,
            parishbook::presentation::http::members::update,
            parishbook::presentation::http::members::delete_one,
            parishbook::presentation::http::households::list,
            parishbook::presentation::http::households::create,
            parishbook::presentation::http::households::get_one,
            parishbook::presentation::http::households::update,
            parishbook::presentation::http::households::delete_one,
            parishbook::presentation::http::attendance::list_services,
            parishbook::presentation::http::attendance::create_service,
            parishbook::presentation::http::attendance::record,
            parishbook::presentation::http::attendance::list,
            parishbook::presentation::http::giving::list_funds,
            parishbook::presentation::http::giving::create_fund,
            parishbook::presentation::http::giving::record,
            parishbook::presentation::http::giving::list,
            parishbook::presentation::http::imports::import_members,
            parishbook::presentation::http::imports::import_contributions,
            parishbook::presentation::http::statements::list,
            parishbook::presentation::http::statements::generate,
            parishbook::presentation::http::statements::download_pdf,
            parishbook::presentation::http::reports::members,
            parishbook::presentation::http::reports::giving,
            parishbook::presentation::http::reports::attendance,
            parishbook::presentation::http::billing::subscription,
            parishbook::presentation::http::billing::checkout,
            parishbook::presentation::http::billing::webhook,
            parishbook::presentation::http::health::health,
        ),
        components(schemas(
            parishbook::presentation::http::auth::RegisterChurchRequest,
            parishbook::presentation::http::auth::RegisterChurchResponse,
            parishbook::presentation::http::auth::ChurchResponse,
            parishbook::presentation::http::auth::LoginRequest,
            parishbook::presentation::http::auth::LoginResponse,
            parishbook::presentation::http::auth::UserResponse,
            parishbook::presentation::http::invitations::InvitePayload,
            parishbook::presentation::http::invitations::InvitationResponse,
            parishbook::presentation::http::invitations::AcceptPayload,
            parishbook::presentation::http::members::MemberPayload,
            parishbook::presentation::http::members::MemberResponse,
            parishbook::presentation::http::households::HouseholdPayload,
            parishbook::presentation::http::households::HouseholdResponse,
            parishbook::presentation::http::households::HouseholdListItem,
            parishbook::presentation::http::households::HouseholdDetail,
            parishbook::presentation::http::attendance::ServicePayload,
            parishbook::presentation::http::attendance::ServiceResponse,
            parishbook::presentation::http::attendance::RecordAttendancePayload,
            parishbook::presentation::http::attendance::RecordAttendanceResponse,
            parishbook::presentation::http::attendance::AttendanceRecordResponse,
            parishbook::presentation::http::attendance::HeadcountResponse,
            parishbook::presentation::http::attendance::AttendanceListResponse,
            parishbook::presentation::http::giving::FundPayload,
            parishbook::presentation::http::giving::FundResponse,
            parishbook::presentation::http::giving::ContributionPayload,
            parishbook::presentation::http::giving::ContributionResponse,
            parishbook::presentation::http::giving::ContributionListResponse,
            parishbook::presentation::http::imports::ImportResponse,
            parishbook::presentation::http::plan_gate::UpgradeRequiredResponse,
            parishbook::presentation::http::statements::StatementResponse,
            parishbook::presentation::http::statements::GenerateResponse,
            parishbook::presentation::http::billing::SubscriptionResponse,
            parishbook::presentation::http::billing::CheckoutPayload,
            parishbook::presentation::http::billing::CheckoutResponse,
            parishbook::presentation::http::health::HealthResponse,
            parishbook::application::services::csv_import::RowError,
            parishbook::domain::members::ParticipationStatus,
            parishbook::domain::giving::GivingMethod,
        )),
        tags(
            (name = "Auth", description = "Registration and sign-in"),
            (name = "Invitations", description = "Staff invitations"),
            (name = "Members", description = "Member records"),
            (name = "Households", description = "Household records"),
            (name = "Attendance", description = "Services and attendance"),
            (name = "Giving", description = "Funds and contributions"),
            (name = "Imports", description = "CSV bulk imports"),
            (name = "Statements", description = "Annual giving statements"),
            (name = "Reports", description = "CSV report downloads"),
            (name = "Billing", description = "Subscription and checkout"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "parishbook=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(port = cfg.api_port, base_domain = %cfg.base_domain, "Starting Parishbook backend");

    // Database
    let pool = parishbook::infrastructure::db::connect_pool(&cfg).await?;
    parishbook::infrastructure::db::migrate(&pool).await?;

    let tenant_repo = Arc::new(repos::tenant_repository_sqlx::SqlxTenantRepository::new(
        pool.clone(),
    ));
    let user_repo = Arc::new(repos::user_repository_sqlx::SqlxUserRepository::new(
        pool.clone(),
    ));
    let invitation_repo = Arc::new(
        repos::invitation_repository_sqlx::SqlxInvitationRepository::new(pool.clone()),
    );
    let member_repo = Arc::new(repos::member_repository_sqlx::SqlxMemberRepository::new(
        pool.clone(),
    ));
    let household_repo = Arc::new(
        repos::household_repository_sqlx::SqlxHouseholdRepository::new(pool.clone()),
    );
    let attendance_repo = Arc::new(
        repos::attendance_repository_sqlx::SqlxAttendanceRepository::new(pool.clone()),
    );
    let giving_repo = Arc::new(repos::giving_repository_sqlx::SqlxGivingRepository::new(
        pool.clone(),
    ));
    let statement_repo = Arc::new(
        repos::statement_repository_sqlx::SqlxStatementRepository::new(pool.clone()),
    );
    let import_repo = Arc::new(repos::import_repository_sqlx::SqlxImportRepository::new(
        pool.clone(),
    ));
    let billing_repo = Arc::new(repos::billing_repository_sqlx::SqlxBillingRepository::new(
        pool.clone(),
    ));

    let payment_gateway: Arc<dyn PaymentGateway> =
        match (cfg.payment_api_url.clone(), cfg.payment_api_key.clone()) {
            (Some(url), Some(key)) => Arc::new(HostedCheckoutGateway::new(url, key)),
            _ => {
                tracing::info!("payments_not_configured");
                Arc::new(DisabledPaymentGateway)
            }
        };
    let mail_gateway: Arc<dyn MailGateway> =
        match (cfg.mail_api_url.clone(), cfg.mail_api_key.clone()) {
            (Some(url), Some(key)) => {
                Arc::new(HttpMailGateway::new(url, key, cfg.mail_from.clone()))
            }
            _ => {
                tracing::info!("mail_not_configured_using_log_gateway");
                Arc::new(LogMailGateway)
            }
        };

    let services = AppServices::new(
        tenant_repo,
        user_repo,
        invitation_repo,
        member_repo,
        household_repo,
        attendance_repo,
        giving_repo,
        statement_repo,
        import_repo,
        billing_repo,
        payment_gateway,
        mail_gateway,
    );

    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS. Tenants live on subdomains of the frontend origin, so
    // subdomain requests are same-site; the explicit origin covers the apex.
    let cors = if let Some(origin) = cfg.frontend_url.clone() {
        match HeaderValue::from_str(&origin) {
            Ok(v) => CorsLayer::new()
                .allow_origin(v)
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true),
            Err(_) => CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true),
        }
    } else if cfg.is_production {
        CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
    } else {
        // Development convenience
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true)
    };

    let app = Router::new()
        .nest(
            "/api",
            parishbook::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            parishbook::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::invitations::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::members::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::households::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::attendance::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::giving::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::imports::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::statements::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::reports::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::billing::routes(ctx.clone()),
        )
        .nest(
            "/api",
            parishbook::presentation::http::billing::webhook_routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        // Imports are the largest accepted bodies; leave headroom for the
        // multipart envelope.
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
