use uuid::Uuid;

use crate::application::ports::statement_repository::StatementRepository;
use crate::domain::giving::GivingStatement;

pub struct ListStatements<'a, R: StatementRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: StatementRepository + ?Sized> ListStatements<'a, R> {
    pub async fn execute(&self, church_id: Uuid, year: i32) -> anyhow::Result<Vec<GivingStatement>> {
        self.repo.list_statements(church_id, year).await
    }
}
