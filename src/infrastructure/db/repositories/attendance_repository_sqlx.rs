use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::attendance_repository::{AttendanceFilter, AttendanceRepository};
use crate::domain::attendance::{AttendanceRecord, Headcount, Service};
use crate::infrastructure::db::PgPool;

pub struct SqlxAttendanceRepository {
    pub pool: PgPool,
}

impl SqlxAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_service(row: &sqlx::postgres::PgRow) -> Service {
    Service {
        id: row.get("id"),
        church_id: row.get("church_id"),
        name: row.get("name"),
        starts_at: row.try_get("starts_at").ok(),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AttendanceRepository for SqlxAttendanceRepository {
    async fn create_service(
        &self,
        church_id: Uuid,
        name: &str,
        starts_at: Option<&str>,
    ) -> anyhow::Result<Service> {
        let row = sqlx::query(
            "INSERT INTO services (church_id, name, starts_at)
             VALUES ($1, $2, $3)
             RETURNING id, church_id, name, starts_at, created_at",
        )
        .bind(church_id)
        .bind(name)
        .bind(starts_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_service(&row))
    }

    async fn list_services(&self, church_id: Uuid) -> anyhow::Result<Vec<Service>> {
        let rows = sqlx::query(
            "SELECT id, church_id, name, starts_at, created_at FROM services
             WHERE church_id = $1 ORDER BY name",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_service).collect())
    }

    async fn find_service(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Service>> {
        let row = sqlx::query(
            "SELECT id, church_id, name, starts_at, created_at FROM services
             WHERE church_id = $1 AND id = $2",
        )
        .bind(church_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_service))
    }

    async fn record_attendance(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        attended_on: NaiveDate,
        member_ids: &[Uuid],
    ) -> anyhow::Result<u64> {
        // Members outside the church are silently skipped by the join.
        let res = sqlx::query(
            "INSERT INTO attendance_records (church_id, service_id, member_id, attended_on)
             SELECT $1, $2, m.id, $3 FROM members m
             WHERE m.church_id = $1 AND m.id = ANY($4)
             ON CONFLICT (service_id, member_id, attended_on) DO NOTHING",
        )
        .bind(church_id)
        .bind(service_id)
        .bind(attended_on)
        .bind(member_ids)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn list_attendance(
        &self,
        church_id: Uuid,
        filter: &AttendanceFilter,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let rows = sqlx::query(
            "SELECT a.id, a.service_id, s.name AS service_name, a.member_id,
                    m.first_name || ' ' || m.last_name AS member_name, a.attended_on
             FROM attendance_records a
             JOIN services s ON s.id = a.service_id
             JOIN members m ON m.id = a.member_id
             WHERE a.church_id = $1
               AND ($2::uuid IS NULL OR a.service_id = $2)
               AND ($3::date IS NULL OR a.attended_on >= $3)
               AND ($4::date IS NULL OR a.attended_on <= $4)
             ORDER BY a.attended_on DESC, s.name, member_name",
        )
        .bind(church_id)
        .bind(filter.service_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| AttendanceRecord {
                id: r.get("id"),
                service_id: r.get("service_id"),
                service_name: r.get("service_name"),
                member_id: r.get("member_id"),
                member_name: r.get("member_name"),
                attended_on: r.get("attended_on"),
            })
            .collect())
    }

    async fn headcounts(
        &self,
        church_id: Uuid,
        filter: &AttendanceFilter,
    ) -> anyhow::Result<Vec<Headcount>> {
        let rows = sqlx::query(
            "SELECT a.attended_on, s.name AS service_name, COUNT(*) AS count
             FROM attendance_records a
             JOIN services s ON s.id = a.service_id
             WHERE a.church_id = $1
               AND ($2::uuid IS NULL OR a.service_id = $2)
               AND ($3::date IS NULL OR a.attended_on >= $3)
               AND ($4::date IS NULL OR a.attended_on <= $4)
             GROUP BY a.attended_on, s.name
             ORDER BY a.attended_on DESC, s.name",
        )
        .bind(church_id)
        .bind(filter.service_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| Headcount {
                attended_on: r.get("attended_on"),
                service_name: r.get("service_name"),
                count: r.get("count"),
            })
            .collect())
    }
}
