use async_trait::async_trait;

use crate::domain::tenancy::{Church, PlanTier};

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub url: String,
}

/// Hosted-checkout payment processor. Implementations talk to the processor's
/// HTTP API; tests substitute an in-memory fake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        church: &Church,
        plan: PlanTier,
        billing_email: &str,
    ) -> anyhow::Result<CheckoutSession>;
}
