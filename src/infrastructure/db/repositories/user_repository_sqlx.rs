use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::infrastructure::db::PgPool;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(row: &sqlx::postgres::PgRow) -> UserRow {
    UserRow {
        id: row.get("id"),
        church_id: row.get("church_id"),
        email: row.get("email"),
        name: row.get("name"),
        role: row.get("role"),
        password_hash: row.try_get("password_hash").ok(),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        church_id: Uuid,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<UserRow> {
        let row = sqlx::query(
            r#"INSERT INTO users (church_id, email, name, password_hash, role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, church_id, email, name, role, password_hash"#,
        )
        .bind(church_id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_user(&row))
    }

    async fn find_by_email(
        &self,
        church_id: Uuid,
        email: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, church_id, email, name, role, password_hash
               FROM users WHERE church_id = $1 AND email = $2"#,
        )
        .bind(church_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, church_id, email, name, role, password_hash
               FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_user))
    }
}
