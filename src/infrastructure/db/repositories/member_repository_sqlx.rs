use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

use crate::application::ports::member_repository::{MemberFilter, MemberRepository, NewMember};
use crate::domain::members::{Member, ParticipationStatus};
use crate::infrastructure::db::PgPool;

pub struct SqlxMemberRepository {
    pub pool: PgPool,
}

impl SqlxMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_member(row: &sqlx::postgres::PgRow) -> Member {
    let status: String = row.get("participation_status");
    Member {
        id: row.get("id"),
        church_id: row.get("church_id"),
        household_id: row.try_get("household_id").ok(),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.try_get("email").ok(),
        phone: row.try_get("phone").ok(),
        birthdate: row.try_get("birthdate").ok(),
        participation_status: ParticipationStatus::parse(&status)
            .unwrap_or(ParticipationStatus::Active),
        joined_on: row.try_get("joined_on").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub(crate) const MEMBER_COLS: &str = "id, church_id, household_id, first_name, last_name, email, \
     phone, birthdate, participation_status, joined_on, created_at, updated_at";

/// LIKE/ILIKE wildcards in user input match literally, not as patterns.
fn escape_like(q: &str) -> String {
    q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[async_trait]
impl MemberRepository for SqlxMemberRepository {
    async fn create_member(&self, church_id: Uuid, new: &NewMember) -> anyhow::Result<Member> {
        let status = new
            .participation_status
            .unwrap_or(ParticipationStatus::Active);
        let row = sqlx::query(&format!(
            "INSERT INTO members (church_id, household_id, first_name, last_name, email, phone,
                                  birthdate, participation_status, joined_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {MEMBER_COLS}"
        ))
        .bind(church_id)
        .bind(new.household_id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.email.as_deref())
        .bind(new.phone.as_deref())
        .bind(new.birthdate)
        .bind(status.as_str())
        .bind(new.joined_on)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_member(&row))
    }

    async fn update_member(
        &self,
        church_id: Uuid,
        id: Uuid,
        new: &NewMember,
    ) -> anyhow::Result<Option<Member>> {
        let status = new
            .participation_status
            .unwrap_or(ParticipationStatus::Active);
        let row = sqlx::query(&format!(
            "UPDATE members SET household_id = $3, first_name = $4, last_name = $5, email = $6,
                    phone = $7, birthdate = $8, participation_status = $9, joined_on = $10,
                    updated_at = now()
             WHERE church_id = $1 AND id = $2
             RETURNING {MEMBER_COLS}"
        ))
        .bind(church_id)
        .bind(id)
        .bind(new.household_id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.email.as_deref())
        .bind(new.phone.as_deref())
        .bind(new.birthdate)
        .bind(status.as_str())
        .bind(new.joined_on)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_member))
    }

    async fn get_member(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Member>> {
        let row = sqlx::query(&format!(
            "SELECT {MEMBER_COLS} FROM members WHERE church_id = $1 AND id = $2"
        ))
        .bind(church_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_member))
    }

    async fn list_members(
        &self,
        church_id: Uuid,
        filter: &MemberFilter,
    ) -> anyhow::Result<Vec<Member>> {
        let sql = format!(
            "SELECT {MEMBER_COLS} FROM members
             WHERE church_id = $1
               AND ($2::text IS NULL OR participation_status = $2)
               AND ($3::text IS NULL OR first_name ILIKE $3 OR last_name ILIKE $3
                    OR COALESCE(email, '') ILIKE $3)
               AND ($4::uuid IS NULL OR household_id = $4)
             ORDER BY last_name, first_name
             LIMIT $5 OFFSET $6"
        );

        let pattern = filter
            .q
            .as_deref()
            .map(|q| format!("%{}%", escape_like(q)));
        let rows = sqlx::query(&sql)
            .bind(church_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(pattern)
            .bind(filter.household_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_member).collect())
    }

    async fn count_members(&self, church_id: Uuid) -> anyhow::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM members WHERE church_id = $1")
            .bind(church_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("cnt"))
    }

    async fn has_history(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM contributions WHERE church_id = $1 AND member_id = $2)
                 OR EXISTS(SELECT 1 FROM attendance_records
                           WHERE church_id = $1 AND member_id = $2) AS has_history",
        )
        .bind(church_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("has_history"))
    }

    async fn delete_member(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM members WHERE church_id = $1 AND id = $2")
            .bind(church_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn email_index(&self, church_id: Uuid) -> anyhow::Result<HashMap<String, Uuid>> {
        let rows = sqlx::query(
            "SELECT id, lower(email) AS email FROM members
             WHERE church_id = $1 AND email IS NOT NULL",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| (r.get::<String, _>("email"), r.get::<Uuid, _>("id")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_wildcards_are_matched_literally() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("smith"), "smith");
    }
}
