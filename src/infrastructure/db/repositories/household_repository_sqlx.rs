use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::household_repository::{
    HouseholdRepository, HouseholdWithCount, NewHousehold,
};
use crate::domain::households::Household;
use crate::domain::members::Member;
use crate::infrastructure::db::repositories::member_repository_sqlx::{MEMBER_COLS, map_member};
use crate::infrastructure::db::PgPool;

pub struct SqlxHouseholdRepository {
    pub pool: PgPool,
}

impl SqlxHouseholdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_household(row: &sqlx::postgres::PgRow) -> Household {
    Household {
        id: row.get("id"),
        church_id: row.get("church_id"),
        name: row.get("name"),
        address_line1: row.try_get("address_line1").ok(),
        address_line2: row.try_get("address_line2").ok(),
        city: row.try_get("city").ok(),
        state: row.try_get("state").ok(),
        postal_code: row.try_get("postal_code").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const HOUSEHOLD_COLS: &str = "id, church_id, name, address_line1, address_line2, city, state, \
     postal_code, created_at, updated_at";

#[async_trait]
impl HouseholdRepository for SqlxHouseholdRepository {
    async fn create_household(
        &self,
        church_id: Uuid,
        new: &NewHousehold,
    ) -> anyhow::Result<Household> {
        let row = sqlx::query(&format!(
            "INSERT INTO households (church_id, name, address_line1, address_line2, city, state,
                                     postal_code)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {HOUSEHOLD_COLS}"
        ))
        .bind(church_id)
        .bind(&new.name)
        .bind(new.address_line1.as_deref())
        .bind(new.address_line2.as_deref())
        .bind(new.city.as_deref())
        .bind(new.state.as_deref())
        .bind(new.postal_code.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(map_household(&row))
    }

    async fn update_household(
        &self,
        church_id: Uuid,
        id: Uuid,
        new: &NewHousehold,
    ) -> anyhow::Result<Option<Household>> {
        let row = sqlx::query(&format!(
            "UPDATE households SET name = $3, address_line1 = $4, address_line2 = $5, city = $6,
                    state = $7, postal_code = $8, updated_at = now()
             WHERE church_id = $1 AND id = $2
             RETURNING {HOUSEHOLD_COLS}"
        ))
        .bind(church_id)
        .bind(id)
        .bind(&new.name)
        .bind(new.address_line1.as_deref())
        .bind(new.address_line2.as_deref())
        .bind(new.city.as_deref())
        .bind(new.state.as_deref())
        .bind(new.postal_code.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_household))
    }

    async fn get_household(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Household>> {
        let row = sqlx::query(&format!(
            "SELECT {HOUSEHOLD_COLS} FROM households WHERE church_id = $1 AND id = $2"
        ))
        .bind(church_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_household))
    }

    async fn list_households(&self, church_id: Uuid) -> anyhow::Result<Vec<HouseholdWithCount>> {
        let rows = sqlx::query(
            "SELECT h.id, h.church_id, h.name, h.address_line1, h.address_line2, h.city, h.state,
                    h.postal_code, h.created_at, h.updated_at,
                    COUNT(m.id) AS member_count
             FROM households h
             LEFT JOIN members m ON m.household_id = h.id
             WHERE h.church_id = $1
             GROUP BY h.id
             ORDER BY h.name",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| HouseholdWithCount {
                household: map_household(r),
                member_count: r.get("member_count"),
            })
            .collect())
    }

    async fn members_of(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Vec<Member>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLS} FROM members
             WHERE church_id = $1 AND household_id = $2
             ORDER BY last_name, first_name"
        ))
        .bind(church_id)
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_member).collect())
    }

    async fn delete_household(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM households WHERE church_id = $1 AND id = $2")
            .bind(church_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
