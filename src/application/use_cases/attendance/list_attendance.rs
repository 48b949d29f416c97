use uuid::Uuid;

use crate::application::ports::attendance_repository::{AttendanceFilter, AttendanceRepository};
use crate::domain::attendance::{AttendanceRecord, Headcount};

pub struct ListAttendance<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> ListAttendance<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        filter: &AttendanceFilter,
    ) -> anyhow::Result<(Vec<AttendanceRecord>, Vec<Headcount>)> {
        let records = self.repo.list_attendance(church_id, filter).await?;
        let headcounts = self.repo.headcounts(church_id, filter).await?;
        Ok((records, headcounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    use crate::domain::attendance::Service;

    #[derive(Default)]
    struct FakeAttendance {
        headcount_filters: Mutex<Vec<AttendanceFilter>>,
    }

    #[async_trait]
    impl AttendanceRepository for FakeAttendance {
        async fn create_service(
            &self,
            _: Uuid,
            _: &str,
            _: Option<&str>,
        ) -> anyhow::Result<Service> {
            unimplemented!()
        }
        async fn list_services(&self, _: Uuid) -> anyhow::Result<Vec<Service>> {
            unimplemented!()
        }
        async fn find_service(&self, _: Uuid, _: Uuid) -> anyhow::Result<Option<Service>> {
            unimplemented!()
        }
        async fn record_attendance(
            &self,
            _: Uuid,
            _: Uuid,
            _: NaiveDate,
            _: &[Uuid],
        ) -> anyhow::Result<u64> {
            unimplemented!()
        }
        async fn list_attendance(
            &self,
            _: Uuid,
            _: &AttendanceFilter,
        ) -> anyhow::Result<Vec<AttendanceRecord>> {
            Ok(Vec::new())
        }
        async fn headcounts(
            &self,
            _: Uuid,
            filter: &AttendanceFilter,
        ) -> anyhow::Result<Vec<Headcount>> {
            self.headcount_filters.lock().unwrap().push(filter.clone());
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn the_service_filter_narrows_the_headcounts_too() {
        let repo = FakeAttendance::default();
        let uc = ListAttendance { repo: &repo };
        let service_id = Uuid::new_v4();
        let filter = AttendanceFilter {
            service_id: Some(service_id),
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
        };
        uc.execute(Uuid::new_v4(), &filter).await.unwrap();
        let seen = repo.headcount_filters.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].service_id, Some(service_id));
        assert_eq!(seen[0].from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }
}
