use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::tenant_repository::TenantRepository;
use crate::domain::tenancy::{Church, PlanTier};
use crate::infrastructure::db::PgPool;

pub struct SqlxTenantRepository {
    pub pool: PgPool,
}

impl SqlxTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_church(row: &sqlx::postgres::PgRow) -> Church {
    let plan: String = row.get("plan");
    Church {
        id: row.get("id"),
        name: row.get("name"),
        subdomain: row.get("subdomain"),
        plan: PlanTier::parse(&plan).unwrap_or(PlanTier::Starter),
        billing_customer_id: row.try_get("billing_customer_id").ok(),
        created_at: row.get("created_at"),
    }
}

const CHURCH_COLS: &str = "id, name, subdomain, plan, billing_customer_id, created_at";

#[async_trait]
impl TenantRepository for SqlxTenantRepository {
    async fn create_church(&self, name: &str, subdomain: &str) -> anyhow::Result<Church> {
        let row = sqlx::query(&format!(
            "INSERT INTO churches (name, subdomain) VALUES ($1, $2) RETURNING {CHURCH_COLS}"
        ))
        .bind(name)
        .bind(subdomain)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_church(&row))
    }

    async fn find_by_subdomain(&self, subdomain: &str) -> anyhow::Result<Option<Church>> {
        let row = sqlx::query(&format!(
            "SELECT {CHURCH_COLS} FROM churches WHERE subdomain = $1"
        ))
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_church))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Church>> {
        let row = sqlx::query(&format!("SELECT {CHURCH_COLS} FROM churches WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_church))
    }

    async fn find_by_billing_customer(
        &self,
        customer_id: &str,
    ) -> anyhow::Result<Option<Church>> {
        let row = sqlx::query(&format!(
            "SELECT {CHURCH_COLS} FROM churches WHERE billing_customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_church))
    }

    async fn set_plan(&self, church_id: Uuid, plan: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE churches SET plan = $2 WHERE id = $1")
            .bind(church_id)
            .bind(plan)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_billing_customer(
        &self,
        church_id: Uuid,
        customer_id: &str,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE churches SET billing_customer_id = $2 WHERE id = $1")
            .bind(church_id)
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
