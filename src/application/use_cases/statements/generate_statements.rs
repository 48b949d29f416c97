use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::giving_repository::GivingRepository;
use crate::application::ports::statement_repository::StatementRepository;

pub struct GenerateStatements<'a, G, S>
where
    G: GivingRepository + ?Sized,
    S: StatementRepository + ?Sized,
{
    pub giving: &'a G,
    pub statements: &'a S,
}

#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub year: i32,
    pub households: usize,
    pub total: Decimal,
}

impl<'a, G, S> GenerateStatements<'a, G, S>
where
    G: GivingRepository + ?Sized,
    S: StatementRepository + ?Sized,
{
    /// Upserts one statement row per household with deductible giving in the
    /// year. Re-running refreshes totals; households without deductible
    /// giving are skipped.
    pub async fn execute(&self, church_id: Uuid, year: i32) -> anyhow::Result<GenerateSummary> {
        let totals = self
            .giving
            .deductible_totals_by_household(church_id, year)
            .await?;
        let mut grand_total = Decimal::ZERO;
        for (household_id, total) in &totals {
            self.statements
                .upsert_statement(church_id, *household_id, year, *total)
                .await?;
            grand_total += *total;
        }
        Ok(GenerateSummary {
            year,
            households: totals.len(),
            total: grand_total,
        })
    }
}
