use uuid::Uuid;

use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::domain::attendance::Service;

pub struct CreateService<'a, R: AttendanceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AttendanceRepository + ?Sized> CreateService<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        name: &str,
        starts_at: Option<&str>,
    ) -> anyhow::Result<Service> {
        self.repo.create_service(church_id, name.trim(), starts_at).await
    }
}
