use uuid::Uuid;

use crate::application::ports::giving_repository::GivingRepository;
use crate::application::ports::household_repository::HouseholdRepository;
use crate::application::services::statements as statement_svc;
use crate::domain::tenancy::Church;

pub struct StatementPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct RenderStatementPdf<'a, G, H>
where
    G: GivingRepository + ?Sized,
    H: HouseholdRepository + ?Sized,
{
    pub giving: &'a G,
    pub households: &'a H,
}

impl<'a, G, H> RenderStatementPdf<'a, G, H>
where
    G: GivingRepository + ?Sized,
    H: HouseholdRepository + ?Sized,
{
    /// Renders from live contribution rows, so the download always reflects
    /// current data even if generation ran earlier.
    pub async fn execute(
        &self,
        church: &Church,
        household_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Option<StatementPdf>> {
        let household = match self.households.get_household(church.id, household_id).await? {
            Some(h) => h,
            None => return Ok(None),
        };
        let lines = self
            .giving
            .statement_lines(church.id, household_id, year)
            .await?;
        let doc = statement_svc::build_document(
            &church.name,
            &household.name,
            household.address_lines(),
            year,
            lines,
        );
        let bytes = statement_svc::render_pdf(&doc)?;
        let filename = format!(
            "giving-statement-{}-{}.pdf",
            year,
            household.name.to_ascii_lowercase().replace(' ', "-")
        );
        Ok(Some(StatementPdf { filename, bytes }))
    }
}
