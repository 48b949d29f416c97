use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct GetMe<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetMe<'a, R> {
    /// Loads the user and confirms they belong to the resolved tenant.
    pub async fn execute(&self, id: Uuid, church_id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = self.repo.find_by_id(id).await?;
        Ok(row.filter(|u| u.church_id == church_id).map(|u| UserRow {
            password_hash: None,
            ..u
        }))
    }
}
