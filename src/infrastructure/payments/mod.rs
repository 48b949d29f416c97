use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::payment_gateway::{CheckoutSession, PaymentGateway};
use crate::domain::tenancy::{Church, PlanTier};

pub mod signature;

/// Talks to the payment processor's hosted-checkout HTTP API. The processor
/// redirects the admin to `url` and reports the result back via webhook.
pub struct HostedCheckoutGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HostedCheckoutGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct CheckoutResponse {
    url: String,
}

#[async_trait]
impl PaymentGateway for HostedCheckoutGateway {
    async fn create_checkout_session(
        &self,
        church: &Church,
        plan: PlanTier,
        billing_email: &str,
    ) -> anyhow::Result<CheckoutSession> {
        let body = serde_json::json!({
            "client_reference_id": church.id,
            "customer": church.billing_customer_id,
            "customer_email": billing_email,
            "plan": plan.as_str(),
        });
        let resp = self
            .client
            .post(format!("{}/checkout/sessions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("checkout session failed: {status} {text}");
        }
        let parsed: CheckoutResponse = resp.json().await?;
        Ok(CheckoutSession { url: parsed.url })
    }
}

/// Used when no payment credentials are configured (local development).
pub struct DisabledPaymentGateway;

#[async_trait]
impl PaymentGateway for DisabledPaymentGateway {
    async fn create_checkout_session(
        &self,
        _church: &Church,
        _plan: PlanTier,
        _billing_email: &str,
    ) -> anyhow::Result<CheckoutSession> {
        anyhow::bail!("payments are not configured")
    }
}
