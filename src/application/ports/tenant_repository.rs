use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::tenancy::Church;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create_church(&self, name: &str, subdomain: &str) -> anyhow::Result<Church>;
    async fn find_by_subdomain(&self, subdomain: &str) -> anyhow::Result<Option<Church>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Church>>;
    async fn find_by_billing_customer(&self, customer_id: &str)
    -> anyhow::Result<Option<Church>>;
    async fn set_plan(&self, church_id: Uuid, plan: &str) -> anyhow::Result<()>;
    async fn set_billing_customer(&self, church_id: Uuid, customer_id: &str)
    -> anyhow::Result<()>;
}
