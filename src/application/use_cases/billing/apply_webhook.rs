use serde::Deserialize;
use uuid::Uuid;

use crate::application::ports::billing_repository::BillingRepository;
use crate::application::ports::tenant_repository::TenantRepository;
use crate::domain::billing::SubscriptionStatus;
use crate::domain::tenancy::{Church, PlanTier};

/// Payment-processor event, already signature-verified by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookData {
    pub church_id: Option<Uuid>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub plan: Option<String>,
    pub status: Option<String>,
    pub current_period_end: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Applied,
    /// Event type we don't act on; acknowledged so the processor stops
    /// retrying.
    Ignored,
    /// Event id seen before; acknowledged without effect.
    Replayed,
    UnknownChurch,
}

pub struct ApplyWebhook<'a, B, T>
where
    B: BillingRepository + ?Sized,
    T: TenantRepository + ?Sized,
{
    pub billing: &'a B,
    pub tenants: &'a T,
}

impl<'a, B, T> ApplyWebhook<'a, B, T>
where
    B: BillingRepository + ?Sized,
    T: TenantRepository + ?Sized,
{
    pub async fn execute(&self, event: &WebhookEvent) -> anyhow::Result<WebhookOutcome> {
        if self.billing.has_event(&event.id).await? {
            return Ok(WebhookOutcome::Replayed);
        }

        let outcome = self.apply(event).await?;
        // Recorded only after a successful apply; a failed delivery stays
        // unrecorded so the processor's retry is not dropped as a replay.
        self.billing.record_event(&event.id).await?;
        Ok(outcome)
    }

    async fn apply(&self, event: &WebhookEvent) -> anyhow::Result<WebhookOutcome> {
        match event.kind.as_str() {
            "checkout.completed" => {
                let church = match self.resolve_church(&event.data).await? {
                    Some(c) => c,
                    None => return Ok(WebhookOutcome::UnknownChurch),
                };
                if let Some(customer) = event.data.customer_id.as_deref() {
                    self.tenants
                        .set_billing_customer(church.id, customer)
                        .await?;
                }
                let plan = self.plan_from(&event.data, church.plan);
                self.billing
                    .upsert_subscription(
                        church.id,
                        plan.as_str(),
                        SubscriptionStatus::Active.as_str(),
                        event.data.subscription_id.as_deref(),
                        event.data.current_period_end,
                    )
                    .await?;
                self.tenants.set_plan(church.id, plan.as_str()).await?;
                Ok(WebhookOutcome::Applied)
            }
            "subscription.updated" => {
                let church = match self.resolve_church(&event.data).await? {
                    Some(c) => c,
                    None => return Ok(WebhookOutcome::UnknownChurch),
                };
                let plan = self.plan_from(&event.data, church.plan);
                let status = event
                    .data
                    .status
                    .as_deref()
                    .and_then(SubscriptionStatus::parse)
                    .unwrap_or(SubscriptionStatus::Active);
                self.billing
                    .upsert_subscription(
                        church.id,
                        plan.as_str(),
                        status.as_str(),
                        event.data.subscription_id.as_deref(),
                        event.data.current_period_end,
                    )
                    .await?;
                self.tenants.set_plan(church.id, plan.as_str()).await?;
                Ok(WebhookOutcome::Applied)
            }
            "subscription.deleted" => {
                let church = match self.resolve_church(&event.data).await? {
                    Some(c) => c,
                    None => return Ok(WebhookOutcome::UnknownChurch),
                };
                // Canceled tenants drop back to the free tier.
                self.billing
                    .upsert_subscription(
                        church.id,
                        PlanTier::Starter.as_str(),
                        SubscriptionStatus::Canceled.as_str(),
                        event.data.subscription_id.as_deref(),
                        None,
                    )
                    .await?;
                self.tenants
                    .set_plan(church.id, PlanTier::Starter.as_str())
                    .await?;
                Ok(WebhookOutcome::Applied)
            }
            "invoice.payment_failed" => {
                let church = match self.resolve_church(&event.data).await? {
                    Some(c) => c,
                    None => return Ok(WebhookOutcome::UnknownChurch),
                };
                // Plan is kept; only the status flips until payment recovers.
                let existing = self.billing.get_subscription(church.id).await?;
                let plan = existing.map(|s| s.plan).unwrap_or(church.plan);
                self.billing
                    .upsert_subscription(
                        church.id,
                        plan.as_str(),
                        SubscriptionStatus::PastDue.as_str(),
                        event.data.subscription_id.as_deref(),
                        event.data.current_period_end,
                    )
                    .await?;
                Ok(WebhookOutcome::Applied)
            }
            _ => Ok(WebhookOutcome::Ignored),
        }
    }

    async fn resolve_church(&self, data: &WebhookData) -> anyhow::Result<Option<Church>> {
        if let Some(id) = data.church_id {
            return self.tenants.find_by_id(id).await;
        }
        if let Some(customer) = data.customer_id.as_deref() {
            return self.tenants.find_by_billing_customer(customer).await;
        }
        Ok(None)
    }

    fn plan_from(&self, data: &WebhookData, fallback: PlanTier) -> PlanTier {
        data.plan
            .as_deref()
            .and_then(PlanTier::parse)
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::domain::billing::Subscription;

    struct FakeBilling {
        events: Mutex<HashSet<String>>,
        subscription: Mutex<Option<Subscription>>,
        fail_next_upsert: Mutex<bool>,
    }

    impl FakeBilling {
        fn new() -> Self {
            Self {
                events: Mutex::new(HashSet::new()),
                subscription: Mutex::new(None),
                fail_next_upsert: Mutex::new(false),
            }
        }
    }

    #[async_trait]
    impl BillingRepository for FakeBilling {
        async fn get_subscription(&self, _church_id: Uuid) -> anyhow::Result<Option<Subscription>> {
            Ok(self.subscription.lock().unwrap().clone())
        }

        async fn upsert_subscription(
            &self,
            church_id: Uuid,
            plan: &str,
            status: &str,
            processor_subscription_id: Option<&str>,
            current_period_end: Option<chrono::DateTime<chrono::Utc>>,
        ) -> anyhow::Result<Subscription> {
            if std::mem::take(&mut *self.fail_next_upsert.lock().unwrap()) {
                anyhow::bail!("connection reset");
            }
            let sub = Subscription {
                id: Uuid::new_v4(),
                church_id,
                plan: PlanTier::parse(plan).unwrap(),
                status: SubscriptionStatus::parse(status).unwrap(),
                processor_subscription_id: processor_subscription_id.map(str::to_string),
                current_period_end,
                updated_at: chrono::Utc::now(),
            };
            *self.subscription.lock().unwrap() = Some(sub.clone());
            Ok(sub)
        }

        async fn has_event(&self, event_id: &str) -> anyhow::Result<bool> {
            Ok(self.events.lock().unwrap().contains(event_id))
        }

        async fn record_event(&self, event_id: &str) -> anyhow::Result<bool> {
            Ok(self.events.lock().unwrap().insert(event_id.to_string()))
        }
    }

    struct FakeTenants {
        church: Mutex<Church>,
    }

    #[async_trait]
    impl TenantRepository for FakeTenants {
        async fn create_church(&self, _name: &str, _subdomain: &str) -> anyhow::Result<Church> {
            unimplemented!()
        }

        async fn find_by_subdomain(&self, _subdomain: &str) -> anyhow::Result<Option<Church>> {
            Ok(None)
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Church>> {
            let church = self.church.lock().unwrap().clone();
            Ok((church.id == id).then_some(church))
        }

        async fn find_by_billing_customer(
            &self,
            customer_id: &str,
        ) -> anyhow::Result<Option<Church>> {
            let church = self.church.lock().unwrap().clone();
            Ok((church.billing_customer_id.as_deref() == Some(customer_id)).then_some(church))
        }

        async fn set_plan(&self, _church_id: Uuid, plan: &str) -> anyhow::Result<()> {
            self.church.lock().unwrap().plan = PlanTier::parse(plan).unwrap();
            Ok(())
        }

        async fn set_billing_customer(
            &self,
            _church_id: Uuid,
            customer_id: &str,
        ) -> anyhow::Result<()> {
            self.church.lock().unwrap().billing_customer_id = Some(customer_id.to_string());
            Ok(())
        }
    }

    fn church() -> Church {
        Church {
            id: Uuid::new_v4(),
            name: "Grace Chapel".into(),
            subdomain: "grace".into(),
            plan: PlanTier::Starter,
            billing_customer_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn event(id: &str, kind: &str, data: WebhookData) -> WebhookEvent {
        WebhookEvent {
            id: id.to_string(),
            kind: kind.to_string(),
            data,
        }
    }

    #[tokio::test]
    async fn checkout_completed_upgrades_the_plan() {
        let church = church();
        let tenants = FakeTenants {
            church: Mutex::new(church.clone()),
        };
        let billing = FakeBilling::new();
        let uc = ApplyWebhook {
            billing: &billing,
            tenants: &tenants,
        };
        let outcome = uc
            .execute(&event(
                "evt_1",
                "checkout.completed",
                WebhookData {
                    church_id: Some(church.id),
                    customer_id: Some("cus_1".into()),
                    subscription_id: Some("sub_1".into()),
                    plan: Some("standard".into()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Applied);
        assert_eq!(tenants.church.lock().unwrap().plan, PlanTier::Standard);
        let sub = billing.subscription.lock().unwrap().clone().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.processor_subscription_id.as_deref(), Some("sub_1"));
    }

    #[tokio::test]
    async fn replayed_events_are_acknowledged_without_effect() {
        let church = church();
        let tenants = FakeTenants {
            church: Mutex::new(church.clone()),
        };
        let billing = FakeBilling::new();
        let uc = ApplyWebhook {
            billing: &billing,
            tenants: &tenants,
        };
        let evt = event(
            "evt_dup",
            "subscription.deleted",
            WebhookData {
                church_id: Some(church.id),
                ..Default::default()
            },
        );
        assert_eq!(uc.execute(&evt).await.unwrap(), WebhookOutcome::Applied);
        assert_eq!(uc.execute(&evt).await.unwrap(), WebhookOutcome::Replayed);
    }

    #[tokio::test]
    async fn failed_delivery_is_not_recorded_and_the_retry_applies() {
        let church = church();
        let tenants = FakeTenants {
            church: Mutex::new(church.clone()),
        };
        let billing = FakeBilling::new();
        *billing.fail_next_upsert.lock().unwrap() = true;
        let uc = ApplyWebhook {
            billing: &billing,
            tenants: &tenants,
        };
        let evt = event(
            "evt_retry",
            "subscription.updated",
            WebhookData {
                church_id: Some(church.id),
                plan: Some("growth".into()),
                status: Some("active".into()),
                ..Default::default()
            },
        );
        assert!(uc.execute(&evt).await.is_err());
        assert!(billing.subscription.lock().unwrap().is_none());

        // The processor retries the same event id.
        assert_eq!(uc.execute(&evt).await.unwrap(), WebhookOutcome::Applied);
        let sub = billing.subscription.lock().unwrap().clone().unwrap();
        assert_eq!(sub.plan, PlanTier::Growth);
    }

    #[tokio::test]
    async fn unknown_event_types_are_ignored() {
        let tenants = FakeTenants {
            church: Mutex::new(church()),
        };
        let billing = FakeBilling::new();
        let uc = ApplyWebhook {
            billing: &billing,
            tenants: &tenants,
        };
        let outcome = uc
            .execute(&event("evt_2", "customer.created", WebhookData::default()))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored);
    }

    #[tokio::test]
    async fn payment_failed_keeps_the_plan() {
        let mut c = church();
        c.plan = PlanTier::Growth;
        let church_id = c.id;
        let tenants = FakeTenants {
            church: Mutex::new(c),
        };
        let billing = FakeBilling::new();
        billing
            .upsert_subscription(church_id, "growth", "active", Some("sub_9"), None)
            .await
            .unwrap();
        let uc = ApplyWebhook {
            billing: &billing,
            tenants: &tenants,
        };
        let outcome = uc
            .execute(&event(
                "evt_3",
                "invoice.payment_failed",
                WebhookData {
                    church_id: Some(church_id),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Applied);
        let sub = billing.subscription.lock().unwrap().clone().unwrap();
        assert_eq!(sub.plan, PlanTier::Growth);
        assert_eq!(sub.status, SubscriptionStatus::PastDue);
    }
}
