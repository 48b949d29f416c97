use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::attendance::{AttendanceRecord, Headcount, Service};

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub service_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn create_service(
        &self,
        church_id: Uuid,
        name: &str,
        starts_at: Option<&str>,
    ) -> anyhow::Result<Service>;
    async fn list_services(&self, church_id: Uuid) -> anyhow::Result<Vec<Service>>;
    async fn find_service(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Service>>;
    /// Idempotent per (service, member, date); only members of the church are
    /// inserted. Returns the number of newly recorded rows.
    async fn record_attendance(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        attended_on: NaiveDate,
        member_ids: &[Uuid],
    ) -> anyhow::Result<u64>;
    async fn list_attendance(
        &self,
        church_id: Uuid,
        filter: &AttendanceFilter,
    ) -> anyhow::Result<Vec<AttendanceRecord>>;
    /// Per-service, per-date totals honoring every field of the filter,
    /// including `service_id`.
    async fn headcounts(
        &self,
        church_id: Uuid,
        filter: &AttendanceFilter,
    ) -> anyhow::Result<Vec<Headcount>>;
}
