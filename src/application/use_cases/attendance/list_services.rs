use uuid::Uuid;

use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::domain::attendance::Service;

pub struct ListServices<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> ListServices<'a, R> {
    pub async fn execute(&self, church_id: Uuid) -> anyhow::Result<Vec<Service>> {
        self.repo.list_services(church_id).await
    }
}
