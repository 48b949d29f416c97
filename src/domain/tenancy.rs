use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tenant. Every shared table carries a `church_id` pointing here.
#[derive(Debug, Clone)]
pub struct Church {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub plan: PlanTier,
    pub billing_customer_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Subscription tiers, ordered by capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Starter,
    Standard,
    Growth,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Starter => "starter",
            PlanTier::Standard => "standard",
            PlanTier::Growth => "growth",
        }
    }

    pub fn parse(s: &str) -> Option<PlanTier> {
        match s {
            "starter" => Some(PlanTier::Starter),
            "standard" => Some(PlanTier::Standard),
            "growth" => Some(PlanTier::Growth),
            _ => None,
        }
    }
}

/// Staff roles within a church, ordered by authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Staff,
    Admin,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "viewer" => Some(Role::Viewer),
            "staff" => Some(Role::Staff),
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            _ => None,
        }
    }
}

static SUBDOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]{1,61})[a-z0-9]$").unwrap());

const RESERVED_SUBDOMAINS: &[&str] = &["www", "api", "app", "admin", "billing"];

/// Validates a tenant subdomain label: lowercase alphanumeric plus hyphens,
/// 3-63 chars, no leading/trailing hyphen, not a reserved name.
pub fn validate_subdomain(label: &str) -> Result<(), SubdomainError> {
    if !SUBDOMAIN_RE.is_match(label) {
        return Err(SubdomainError::Invalid);
    }
    if RESERVED_SUBDOMAINS.contains(&label) {
        return Err(SubdomainError::Reserved);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubdomainError {
    #[error("subdomain must be 3-63 lowercase alphanumeric characters or hyphens")]
    Invalid,
    #[error("subdomain is reserved")]
    Reserved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_labels() {
        assert!(validate_subdomain("gracechapel").is_ok());
        assert!(validate_subdomain("first-baptist-2").is_ok());
    }

    #[test]
    fn rejects_short_uppercase_and_hyphen_edges() {
        assert_eq!(validate_subdomain("ab"), Err(SubdomainError::Invalid));
        assert_eq!(validate_subdomain("Grace"), Err(SubdomainError::Invalid));
        assert_eq!(validate_subdomain("-grace"), Err(SubdomainError::Invalid));
        assert_eq!(validate_subdomain("grace-"), Err(SubdomainError::Invalid));
    }

    #[test]
    fn rejects_reserved_names() {
        assert_eq!(validate_subdomain("www"), Err(SubdomainError::Reserved));
        assert_eq!(validate_subdomain("billing"), Err(SubdomainError::Reserved));
    }

    #[test]
    fn plan_and_role_round_trip() {
        for plan in [PlanTier::Starter, PlanTier::Standard, PlanTier::Growth] {
            assert_eq!(PlanTier::parse(plan.as_str()), Some(plan));
        }
        for role in [Role::Viewer, Role::Staff, Role::Admin, Role::Owner] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert!(Role::Owner > Role::Admin);
        assert!(PlanTier::Growth > PlanTier::Starter);
    }
}
