use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;

use crate::bootstrap::app_context::AppContext;
use crate::domain::tenancy::Church;

/// Resolves the tenant from the request's Host header. A missing or foreign
/// host is a caller error (400); a well-formed subdomain that matches no
/// church is 404.
pub struct TenantHost(pub Church);

#[axum::async_trait]
impl FromRequestParts<AppContext> for TenantHost {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(axum::http::header::HOST)
            .and_then(|v| v.to_str().ok());
        let label = tenant_label(host, &ctx.cfg.base_domain)?;
        let church = ctx
            .tenant_repo()
            .find_by_subdomain(&label)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::NOT_FOUND)?;
        Ok(TenantHost(church))
    }
}

pub(crate) fn tenant_label(host: Option<&str>, base_domain: &str) -> Result<String, StatusCode> {
    host.and_then(|h| parse_subdomain(h, base_domain))
        .ok_or(StatusCode::BAD_REQUEST)
}

/// Extracts the tenant label from `<label>.<base_domain>[:port]`. Exactly one
/// label deep: `a.b.example.com` does not resolve against `example.com`.
pub fn parse_subdomain(host: &str, base_domain: &str) -> Option<String> {
    let host = host.split(':').next()?.to_ascii_lowercase();
    let base = base_domain.to_ascii_lowercase();
    let prefix = host.strip_suffix(&base)?.strip_suffix('.')?;
    if prefix.is_empty() || prefix.contains('.') {
        return None;
    }
    Some(prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_label() {
        assert_eq!(
            parse_subdomain("grace.churchesapp.com", "churchesapp.com"),
            Some("grace".to_string())
        );
        assert_eq!(
            parse_subdomain("grace.localhost:8888", "localhost"),
            Some("grace".to_string())
        );
    }

    #[test]
    fn normalizes_case() {
        assert_eq!(
            parse_subdomain("Grace.ChurchesApp.com", "churchesapp.com"),
            Some("grace".to_string())
        );
    }

    #[test]
    fn rejects_the_bare_base_domain() {
        assert_eq!(parse_subdomain("churchesapp.com", "churchesapp.com"), None);
        assert_eq!(parse_subdomain("localhost:8888", "localhost"), None);
    }

    #[test]
    fn missing_or_foreign_hosts_are_a_caller_error() {
        assert_eq!(
            tenant_label(None, "churchesapp.com"),
            Err(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            tenant_label(Some("evil.com"), "churchesapp.com"),
            Err(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            tenant_label(Some("grace.churchesapp.com"), "churchesapp.com"),
            Ok("grace".to_string())
        );
    }

    #[test]
    fn rejects_nested_and_foreign_hosts() {
        assert_eq!(
            parse_subdomain("a.b.churchesapp.com", "churchesapp.com"),
            None
        );
        assert_eq!(parse_subdomain("evil.com", "churchesapp.com"), None);
        assert_eq!(
            parse_subdomain("xchurchesapp.com", "churchesapp.com"),
            None
        );
    }
}
