use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::invitation_repository::{InvitationRepository, InvitationRow};
use crate::infrastructure::db::PgPool;

pub struct SqlxInvitationRepository {
    pub pool: PgPool,
}

impl SqlxInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_invitation(row: &sqlx::postgres::PgRow) -> InvitationRow {
    InvitationRow {
        id: row.get("id"),
        church_id: row.get("church_id"),
        email: row.get("email"),
        role: row.get("role"),
        token: row.get("token"),
        expires_at: row.get("expires_at"),
        accepted_at: row.try_get("accepted_at").ok(),
        created_at: row.get("created_at"),
    }
}

const INVITATION_COLS: &str =
    "id, church_id, email, role, token, expires_at, accepted_at, created_at";

#[async_trait]
impl InvitationRepository for SqlxInvitationRepository {
    async fn create_invitation(
        &self,
        church_id: Uuid,
        email: &str,
        role: &str,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<InvitationRow> {
        let row = sqlx::query(&format!(
            "INSERT INTO invitations (church_id, email, role, token, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {INVITATION_COLS}"
        ))
        .bind(church_id)
        .bind(email)
        .bind(role)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_invitation(&row))
    }

    async fn list_pending(&self, church_id: Uuid) -> anyhow::Result<Vec<InvitationRow>> {
        let rows = sqlx::query(&format!(
            "SELECT {INVITATION_COLS} FROM invitations
             WHERE church_id = $1 AND accepted_at IS NULL AND expires_at > now()
             ORDER BY created_at DESC"
        ))
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_invitation).collect())
    }

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<InvitationRow>> {
        let row = sqlx::query(&format!(
            "SELECT {INVITATION_COLS} FROM invitations WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_invitation))
    }

    async fn mark_accepted(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE invitations SET accepted_at = now() WHERE id = $1 AND accepted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
