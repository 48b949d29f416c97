use crate::application::ports::payment_gateway::{CheckoutSession, PaymentGateway};
use crate::domain::tenancy::{Church, PlanTier};

pub struct StartCheckout<'a, P: PaymentGateway + ?Sized> {
    pub gateway: &'a P,
}

impl<'a, P: PaymentGateway + ?Sized> StartCheckout<'a, P> {
    /// The plan change itself lands later via webhook; this only opens the
    /// hosted checkout.
    pub async fn execute(
        &self,
        church: &Church,
        plan: PlanTier,
        billing_email: &str,
    ) -> anyhow::Result<CheckoutSession> {
        self.gateway
            .create_checkout_session(church, plan, billing_email)
            .await
    }
}
