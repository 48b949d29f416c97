use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use chrono::{Duration, Utc};
use password_hash::rand_core::OsRng;

use crate::application::ports::billing_repository::BillingRepository;
use crate::application::ports::giving_repository::GivingRepository;
use crate::application::ports::tenant_repository::TenantRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::billing::SubscriptionStatus;
use crate::domain::tenancy::{Church, PlanTier, Role, SubdomainError, validate_subdomain};

const TRIAL_DAYS: i64 = 30;
const SEED_FUND: &str = "General Fund";

pub struct RegisterChurch<'a, T, U, B, G>
where
    T: TenantRepository + ?Sized,
    U: UserRepository + ?Sized,
    B: BillingRepository + ?Sized,
    G: GivingRepository + ?Sized,
{
    pub tenants: &'a T,
    pub users: &'a U,
    pub billing: &'a B,
    pub giving: &'a G,
}

#[derive(Debug, Clone)]
pub struct RegisterChurchRequest {
    pub church_name: String,
    pub subdomain: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

pub enum RegisterOutcome {
    Created { church: Church, user: UserRow },
    SubdomainTaken,
    InvalidSubdomain(SubdomainError),
}

impl<'a, T, U, B, G> RegisterChurch<'a, T, U, B, G>
where
    T: TenantRepository + ?Sized,
    U: UserRepository + ?Sized,
    B: BillingRepository + ?Sized,
    G: GivingRepository + ?Sized,
{
    pub async fn execute(&self, req: &RegisterChurchRequest) -> anyhow::Result<RegisterOutcome> {
        let subdomain = req.subdomain.trim().to_ascii_lowercase();
        if let Err(e) = validate_subdomain(&subdomain) {
            return Ok(RegisterOutcome::InvalidSubdomain(e));
        }
        if self.tenants.find_by_subdomain(&subdomain).await?.is_some() {
            return Ok(RegisterOutcome::SubdomainTaken);
        }

        let church = self
            .tenants
            .create_church(req.church_name.trim(), &subdomain)
            .await?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        let user = self
            .users
            .create_user(
                church.id,
                &req.email.trim().to_ascii_lowercase(),
                req.name.trim(),
                &hash,
                Role::Owner.as_str(),
            )
            .await?;

        self.giving
            .get_or_create_fund(church.id, SEED_FUND)
            .await?;
        self.billing
            .upsert_subscription(
                church.id,
                PlanTier::Starter.as_str(),
                SubscriptionStatus::Trialing.as_str(),
                None,
                Some(Utc::now() + Duration::days(TRIAL_DAYS)),
            )
            .await?;

        Ok(RegisterOutcome::Created { church, user })
    }
}
