use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register_church::{
    RegisterChurch as RegisterUc, RegisterChurchRequest as RegisterDto, RegisterOutcome,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::tenancy::{Church, Role};
use crate::presentation::http::tenant::TenantHost;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterChurchRequest {
    pub church_name: String,
    pub subdomain: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChurchResponse {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub plan: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterChurchResponse {
    pub church: ChurchResponse,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// `tid` binds the token to the tenant it was issued for; a token minted on
/// one subdomain is rejected on every other.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tid: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(ctx)
}

pub(crate) fn user_response(
    row: &crate::application::ports::user_repository::UserRow,
) -> UserResponse {
    UserResponse {
        id: row.id,
        email: row.email.clone(),
        name: row.name.clone(),
        role: row.role.clone(),
    }
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterChurchRequest, security(()), responses(
    (status = 200, body = RegisterChurchResponse),
    (status = 409, description = "Subdomain already taken"),
    (status = 422, description = "Invalid subdomain")
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterChurchRequest>,
) -> Result<Json<RegisterChurchResponse>, StatusCode> {
    let tenants = ctx.tenant_repo();
    let users = ctx.user_repo();
    let billing = ctx.billing_repo();
    let giving = ctx.giving_repo();
    let uc = RegisterUc {
        tenants: tenants.as_ref(),
        users: users.as_ref(),
        billing: billing.as_ref(),
        giving: giving.as_ref(),
    };
    let dto = RegisterDto {
        church_name: req.church_name,
        subdomain: req.subdomain,
        email: req.email,
        name: req.name,
        password: req.password,
    };
    match uc
        .execute(&dto)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        RegisterOutcome::Created { church, user } => Ok(Json(RegisterChurchResponse {
            church: ChurchResponse {
                id: church.id,
                name: church.name,
                subdomain: church.subdomain,
                plan: church.plan.as_str().to_string(),
            },
            user: user_response(&user),
        })),
        RegisterOutcome::SubdomainTaken => Err(StatusCode::CONFLICT),
        RegisterOutcome::InvalidSubdomain(_) => Err(StatusCode::UNPROCESSABLE_ENTITY),
    }
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, description = "Bad credentials")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), StatusCode> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        church_id: church.id,
        email: req.email,
        password: req.password,
    };
    let user = uc
        .execute(&dto)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        tid: church.id.to_string(),
        exp: now + (ctx.cfg.jwt_expires_secs as usize),
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ctx.cfg.jwt_secret.as_bytes()),
    )
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Set HttpOnly cookie with the access token
    let mut headers = HeaderMap::new();
    let secure = ctx
        .cfg
        .frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false);
    let cookie = build_access_cookie(&token, ctx.cfg.jwt_expires_secs, secure);
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(&cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );

    Ok((
        headers,
        Json(LoginResponse {
            access_token: token,
            user: user_response(&user),
        }),
    ))
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth", responses((status = 200, body = UserResponse)))]
pub async fn me(
    State(ctx): State<AppContext>,
    TenantHost(church): TenantHost,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<UserResponse>, StatusCode> {
    let claims = validate_bearer(&ctx.cfg, bearer?)?;
    let user_id = claims_user_for(&claims, &church)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let row = uc
        .execute(user_id, church.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(user_response(&row)))
}

// --- Bearer extractor & JWT utils ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Prefer Authorization header if present
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.to_string()));
            }
        }

        // 2) Fallback to HttpOnly cookie `access_token`
        if let Some(cookie_hdr) = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "access_token") {
                return Ok(Bearer(token));
            }
        }

        Err(StatusCode::UNAUTHORIZED)
    }
}

pub(crate) fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<Claims, StatusCode> {
    let data = jsonwebtoken::decode::<Claims>(
        &bearer.0,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(data.claims)
}

fn claims_user_for(claims: &Claims, church: &Church) -> Result<Uuid, StatusCode> {
    let tid = Uuid::parse_str(&claims.tid).map_err(|_| StatusCode::UNAUTHORIZED)?;
    if tid != church.id {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)
}

/// The authenticated staff member, confirmed to belong to the tenant.
pub struct Authed {
    pub user_id: Uuid,
    pub role: Role,
}

/// Full auth check for tenant-scoped handlers: token validity, tenant
/// binding, and a fresh role read (role changes take effect immediately, not
/// at token expiry).
pub(crate) async fn authenticate(
    ctx: &AppContext,
    church: &Church,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Authed, StatusCode> {
    let claims = validate_bearer(&ctx.cfg, bearer?)?;
    let user_id = claims_user_for(&claims, church)?;
    let row = ctx
        .user_repo()
        .find_by_id(user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .filter(|u| u.church_id == church.id)
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let role = Role::parse(&row.role).ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Authed { user_id, role })
}

// --- Cookie helpers & logout ---

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    // Note: SameSite=Lax for typical same-site SPA/API setups.
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "access_token={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> Result<(HeaderMap, StatusCode), StatusCode> {
    // Clear cookie by setting it expired
    let mut headers = HeaderMap::new();
    let secure = ctx
        .cfg
        .frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false);
    let cookie = if secure {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );
    Ok((headers, StatusCode::NO_CONTENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tenancy::PlanTier;

    fn church(id: Uuid) -> Church {
        Church {
            id,
            name: "Grace Fellowship".to_string(),
            subdomain: "grace".to_string(),
            plan: PlanTier::Starter,
            billing_customer_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn a_token_minted_for_another_tenant_is_rejected() {
        let user_id = Uuid::new_v4();
        let home = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            tid: home.to_string(),
            exp: 0,
        };
        assert_eq!(claims_user_for(&claims, &church(home)), Ok(user_id));
        assert_eq!(
            claims_user_for(&claims, &church(Uuid::new_v4())),
            Err(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn malformed_claim_ids_are_unauthorized() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            tid: "also-not".to_string(),
            exp: 0,
        };
        assert_eq!(
            claims_user_for(&claims, &church(Uuid::new_v4())),
            Err(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn reads_the_named_cookie_out_of_the_header() {
        let header = "theme=dark; access_token=abc.def.ghi ; other=1";
        assert_eq!(
            get_cookie(header, "access_token"),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(get_cookie(header, "missing"), None);
        assert_eq!(get_cookie("", "access_token"), None);
    }

    #[test]
    fn the_access_cookie_round_trips_through_the_parser() {
        let cookie = build_access_cookie("tok", 3600, true);
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=3600"));
        assert_eq!(get_cookie(&cookie, "access_token"), Some("tok".to_string()));

        let plain = build_access_cookie("tok", -5, false);
        assert!(!plain.contains("Secure"));
        assert!(plain.contains("Max-Age=0"));
    }
}
