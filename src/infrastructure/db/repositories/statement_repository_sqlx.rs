use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::statement_repository::StatementRepository;
use crate::domain::giving::GivingStatement;
use crate::infrastructure::db::PgPool;

pub struct SqlxStatementRepository {
    pub pool: PgPool,
}

impl SqlxStatementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_statement(row: &sqlx::postgres::PgRow) -> GivingStatement {
    GivingStatement {
        id: row.get("id"),
        household_id: row.get("household_id"),
        household_name: row.get("household_name"),
        year: row.get("year"),
        total_amount: row.get("total_amount"),
        generated_at: row.get("generated_at"),
    }
}

#[async_trait]
impl StatementRepository for SqlxStatementRepository {
    async fn upsert_statement(
        &self,
        church_id: Uuid,
        household_id: Uuid,
        year: i32,
        total_amount: Decimal,
    ) -> anyhow::Result<GivingStatement> {
        let row = sqlx::query(
            "WITH upserted AS (
                 INSERT INTO giving_statements (church_id, household_id, year, total_amount)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (church_id, household_id, year)
                 DO UPDATE SET total_amount = EXCLUDED.total_amount, generated_at = now()
                 RETURNING id, household_id, year, total_amount, generated_at
             )
             SELECT u.id, u.household_id, h.name AS household_name, u.year, u.total_amount,
                    u.generated_at
             FROM upserted u
             JOIN households h ON h.id = u.household_id",
        )
        .bind(church_id)
        .bind(household_id)
        .bind(year)
        .bind(total_amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_statement(&row))
    }

    async fn list_statements(
        &self,
        church_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Vec<GivingStatement>> {
        let rows = sqlx::query(
            "SELECT s.id, s.household_id, h.name AS household_name, s.year, s.total_amount,
                    s.generated_at
             FROM giving_statements s
             JOIN households h ON h.id = s.household_id
             WHERE s.church_id = $1 AND s.year = $2
             ORDER BY h.name",
        )
        .bind(church_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_statement).collect())
    }
}
