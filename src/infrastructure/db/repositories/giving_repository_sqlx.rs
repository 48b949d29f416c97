use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::giving_repository::{
    GivingFilter, GivingRepository, NewContribution, StatementLineRow,
};
use crate::domain::giving::{Contribution, Fund, GivingMethod};
use crate::infrastructure::db::PgPool;

pub struct SqlxGivingRepository {
    pub pool: PgPool,
}

impl SqlxGivingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_fund(row: &sqlx::postgres::PgRow) -> Fund {
    Fund {
        id: row.get("id"),
        church_id: row.get("church_id"),
        name: row.get("name"),
        tax_deductible: row.get("tax_deductible"),
    }
}

fn map_contribution(row: &sqlx::postgres::PgRow) -> Contribution {
    let method: String = row.get("method");
    Contribution {
        id: row.get("id"),
        member_id: row.get("member_id"),
        member_name: row.get("member_name"),
        fund_id: row.get("fund_id"),
        fund_name: row.get("fund_name"),
        amount: row.get("amount"),
        received_on: row.get("received_on"),
        method: GivingMethod::parse(&method).unwrap_or(GivingMethod::Other),
        note: row.try_get("note").ok(),
    }
}

const CONTRIBUTION_SELECT: &str = "SELECT c.id, c.member_id, \
     m.first_name || ' ' || m.last_name AS member_name, c.fund_id, f.name AS fund_name, \
     c.amount, c.received_on, c.method, c.note \
     FROM contributions c \
     JOIN members m ON m.id = c.member_id \
     JOIN funds f ON f.id = c.fund_id";

const GIVING_FILTER: &str = "c.church_id = $1 \
       AND ($2::date IS NULL OR c.received_on >= $2) \
       AND ($3::date IS NULL OR c.received_on <= $3) \
       AND ($4::uuid IS NULL OR c.fund_id = $4) \
       AND ($5::uuid IS NULL OR c.member_id = $5)";

#[async_trait]
impl GivingRepository for SqlxGivingRepository {
    async fn create_fund(
        &self,
        church_id: Uuid,
        name: &str,
        tax_deductible: bool,
    ) -> anyhow::Result<Fund> {
        let row = sqlx::query(
            "INSERT INTO funds (church_id, name, tax_deductible)
             VALUES ($1, $2, $3)
             RETURNING id, church_id, name, tax_deductible",
        )
        .bind(church_id)
        .bind(name)
        .bind(tax_deductible)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_fund(&row))
    }

    async fn list_funds(&self, church_id: Uuid) -> anyhow::Result<Vec<Fund>> {
        let rows = sqlx::query(
            "SELECT id, church_id, name, tax_deductible FROM funds
             WHERE church_id = $1 ORDER BY name",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_fund).collect())
    }

    async fn find_fund(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Fund>> {
        let row = sqlx::query(
            "SELECT id, church_id, name, tax_deductible FROM funds
             WHERE church_id = $1 AND id = $2",
        )
        .bind(church_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_fund))
    }

    async fn get_or_create_fund(&self, church_id: Uuid, name: &str) -> anyhow::Result<Fund> {
        // Upsert keyed on the per-church name; tax_deductible defaults true
        // for imported funds and is left alone when the fund already exists.
        let row = sqlx::query(
            "INSERT INTO funds (church_id, name, tax_deductible)
             VALUES ($1, $2, true)
             ON CONFLICT (church_id, name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, church_id, name, tax_deductible",
        )
        .bind(church_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_fund(&row))
    }

    async fn create_contribution(
        &self,
        church_id: Uuid,
        new: &NewContribution,
    ) -> anyhow::Result<Contribution> {
        let row = sqlx::query(
            "WITH inserted AS (
                 INSERT INTO contributions (church_id, member_id, fund_id, amount, received_on,
                                            method, note)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id, member_id, fund_id, amount, received_on, method, note
             )
             SELECT i.id, i.member_id, m.first_name || ' ' || m.last_name AS member_name,
                    i.fund_id, f.name AS fund_name, i.amount, i.received_on, i.method, i.note
             FROM inserted i
             JOIN members m ON m.id = i.member_id
             JOIN funds f ON f.id = i.fund_id",
        )
        .bind(church_id)
        .bind(new.member_id)
        .bind(new.fund_id)
        .bind(new.amount)
        .bind(new.received_on)
        .bind(new.method.as_str())
        .bind(new.note.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(map_contribution(&row))
    }

    async fn list_contributions(
        &self,
        church_id: Uuid,
        filter: &GivingFilter,
    ) -> anyhow::Result<Vec<Contribution>> {
        let sql = format!(
            "{CONTRIBUTION_SELECT} WHERE {GIVING_FILTER}
             ORDER BY c.received_on DESC, c.id
             LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query(&sql)
            .bind(church_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.fund_id)
            .bind(filter.member_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_contribution).collect())
    }

    async fn sum_contributions(
        &self,
        church_id: Uuid,
        filter: &GivingFilter,
    ) -> anyhow::Result<Decimal> {
        let sql = format!(
            "SELECT COALESCE(SUM(c.amount), 0) AS total FROM contributions c WHERE {GIVING_FILTER}"
        );
        let row = sqlx::query(&sql)
            .bind(church_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.fund_id)
            .bind(filter.member_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    async fn deductible_totals_by_household(
        &self,
        church_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Vec<(Uuid, Decimal)>> {
        let rows = sqlx::query(
            "SELECT m.household_id, SUM(c.amount) AS total
             FROM contributions c
             JOIN members m ON m.id = c.member_id
             JOIN funds f ON f.id = c.fund_id
             WHERE c.church_id = $1
               AND f.tax_deductible
               AND m.household_id IS NOT NULL
               AND EXTRACT(YEAR FROM c.received_on) = $2
             GROUP BY m.household_id
             ORDER BY m.household_id",
        )
        .bind(church_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| (r.get::<Uuid, _>("household_id"), r.get::<Decimal, _>("total")))
            .collect())
    }

    async fn statement_lines(
        &self,
        church_id: Uuid,
        household_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Vec<StatementLineRow>> {
        let rows = sqlx::query(
            "SELECT c.received_on, f.name AS fund_name,
                    m.first_name || ' ' || m.last_name AS member_name, c.amount
             FROM contributions c
             JOIN members m ON m.id = c.member_id
             JOIN funds f ON f.id = c.fund_id
             WHERE c.church_id = $1
               AND m.household_id = $2
               AND f.tax_deductible
               AND EXTRACT(YEAR FROM c.received_on) = $3
             ORDER BY c.received_on, c.id",
        )
        .bind(church_id)
        .bind(household_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| StatementLineRow {
                received_on: r.get("received_on"),
                fund_name: r.get("fund_name"),
                member_name: r.get("member_name"),
                amount: r.get("amount"),
            })
            .collect())
    }
}
