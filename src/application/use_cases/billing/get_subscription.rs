use uuid::Uuid;

use crate::application::ports::billing_repository::BillingRepository;
use crate::domain::billing::Subscription;

pub struct GetSubscription<'a, R: BillingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: BillingRepository + ?Sized> GetSubscription<'a, R> {
    pub async fn execute(&self, church_id: Uuid) -> anyhow::Result<Option<Subscription>> {
        self.repo.get_subscription(church_id).await
    }
}
