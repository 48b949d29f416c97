use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

use crate::application::ports::import_repository::{
    ContributionInsert, ImportRepository, MemberInsert,
};
use crate::infrastructure::db::PgPool;

pub struct SqlxImportRepository {
    pub pool: PgPool,
}

impl SqlxImportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportRepository for SqlxImportRepository {
    async fn insert_members(&self, church_id: Uuid, rows: &[MemberInsert]) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await?;

        // Resolve household names within the same transaction so a failed
        // batch leaves no orphan households behind.
        let mut households: HashMap<String, Uuid> = HashMap::new();
        for row in rows {
            let Some(name) = row.household_name.as_deref() else {
                continue;
            };
            if households.contains_key(name) {
                continue;
            }
            let existing = sqlx::query("SELECT id FROM households WHERE church_id = $1 AND name = $2")
                .bind(church_id)
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;
            let id = match existing {
                Some(r) => r.get("id"),
                None => sqlx::query(
                    "INSERT INTO households (church_id, name) VALUES ($1, $2) RETURNING id",
                )
                .bind(church_id)
                .bind(name)
                .fetch_one(&mut *tx)
                .await?
                .get("id"),
            };
            households.insert(name.to_string(), id);
        }

        let mut inserted = 0u64;
        for row in rows {
            let household_id = row
                .household_name
                .as_deref()
                .and_then(|n| households.get(n))
                .copied();
            let res = sqlx::query(
                "INSERT INTO members (church_id, household_id, first_name, last_name, email,
                                      phone, birthdate, participation_status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(church_id)
            .bind(household_id)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(row.email.as_deref())
            .bind(row.phone.as_deref())
            .bind(row.birthdate)
            .bind(row.participation_status.as_str())
            .execute(&mut *tx)
            .await?;
            inserted += res.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_contributions(
        &self,
        church_id: Uuid,
        rows: &[ContributionInsert],
    ) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await?;

        // Resolve fund names within the same transaction so a failed batch
        // leaves no orphan funds behind.
        let mut funds: HashMap<String, Uuid> = HashMap::new();
        for row in rows {
            let key = row.fund_name.to_lowercase();
            if funds.contains_key(&key) {
                continue;
            }
            let existing =
                sqlx::query("SELECT id FROM funds WHERE church_id = $1 AND lower(name) = $2")
                    .bind(church_id)
                    .bind(&key)
                    .fetch_optional(&mut *tx)
                    .await?;
            let id = match existing {
                Some(r) => r.get("id"),
                None => sqlx::query(
                    "INSERT INTO funds (church_id, name, tax_deductible)
                     VALUES ($1, $2, TRUE) RETURNING id",
                )
                .bind(church_id)
                .bind(&row.fund_name)
                .fetch_one(&mut *tx)
                .await?
                .get("id"),
            };
            funds.insert(key, id);
        }

        let mut inserted = 0u64;
        for row in rows {
            let fund_id = funds.get(&row.fund_name.to_lowercase()).copied();
            let res = sqlx::query(
                "INSERT INTO contributions (church_id, member_id, fund_id, amount, received_on,
                                            method, note)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(church_id)
            .bind(row.member_id)
            .bind(fund_id)
            .bind(row.amount)
            .bind(row.received_on)
            .bind(row.method.as_str())
            .bind(row.note.as_deref())
            .execute(&mut *tx)
            .await?;
            inserted += res.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}
