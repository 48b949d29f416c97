use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::ports::attendance_repository::{AttendanceFilter, AttendanceRepository};
use crate::application::services::reports;

pub struct AttendanceReport<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> AttendanceReport<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<u8>> {
        let filter = AttendanceFilter {
            from,
            to,
            ..Default::default()
        };
        let headcounts = self.repo.headcounts(church_id, &filter).await?;
        reports::attendance_csv(&headcounts)
    }
}
