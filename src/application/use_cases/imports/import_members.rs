use uuid::Uuid;

use crate::application::access;
use crate::application::ports::import_repository::ImportRepository;
use crate::application::ports::member_repository::MemberRepository;
use crate::application::services::csv_import;
use crate::application::use_cases::imports::ImportOutcome;
use crate::domain::tenancy::PlanTier;

pub struct ImportMembers<'a, I, M>
where
    I: ImportRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    pub imports: &'a I,
    pub members: &'a M,
}

impl<'a, I, M> ImportMembers<'a, I, M>
where
    I: ImportRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    pub async fn execute(
        &self,
        church_id: Uuid,
        plan: PlanTier,
        bytes: &[u8],
        partial: bool,
    ) -> anyhow::Result<ImportOutcome> {
        let parsed = match csv_import::parse_members(bytes) {
            Ok(p) => p,
            Err(e) => return Ok(ImportOutcome::FileError(e)),
        };

        if let Some(cap) = access::member_cap(plan) {
            let count = self.members.count_members(church_id).await?;
            if count + parsed.rows.len() as i64 > cap {
                return Ok(ImportOutcome::CapExceeded { cap });
            }
        }

        if !parsed.errors.is_empty() && !partial {
            return Ok(ImportOutcome::Rejected {
                total_rows: parsed.total_rows,
                errors: parsed.errors,
            });
        }

        let imported = if parsed.rows.is_empty() {
            0
        } else {
            self.imports.insert_members(church_id, &parsed.rows).await?
        };
        Ok(ImportOutcome::Committed {
            imported,
            total_rows: parsed.total_rows,
            errors: parsed.errors,
        })
    }
}
