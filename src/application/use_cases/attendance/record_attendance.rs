use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::ports::attendance_repository::AttendanceRepository;

pub struct RecordAttendance<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

pub enum RecordAttendanceOutcome {
    /// `recorded` counts only newly inserted rows; repeats are absorbed.
    Recorded { recorded: u64 },
    ServiceNotFound,
}

impl<'a, R: AttendanceRepository + ?Sized> RecordAttendance<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        service_id: Uuid,
        attended_on: NaiveDate,
        member_ids: &[Uuid],
    ) -> anyhow::Result<RecordAttendanceOutcome> {
        if self.repo.find_service(church_id, service_id).await?.is_none() {
            return Ok(RecordAttendanceOutcome::ServiceNotFound);
        }
        let recorded = self
            .repo
            .record_attendance(church_id, service_id, attended_on, member_ids)
            .await?;
        Ok(RecordAttendanceOutcome::Recorded { recorded })
    }
}
