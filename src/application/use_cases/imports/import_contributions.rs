use uuid::Uuid;

use crate::application::ports::import_repository::{ContributionInsert, ImportRepository};
use crate::application::ports::member_repository::MemberRepository;
use crate::application::services::csv_import::{self, RowError};
use crate::application::use_cases::imports::ImportOutcome;

pub struct ImportContributions<'a, I, M>
where
    I: ImportRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    pub imports: &'a I,
    pub members: &'a M,
}

impl<'a, I, M> ImportContributions<'a, I, M>
where
    I: ImportRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    pub async fn execute(
        &self,
        church_id: Uuid,
        bytes: &[u8],
        partial: bool,
    ) -> anyhow::Result<ImportOutcome> {
        let parsed = match csv_import::parse_contributions(bytes) {
            Ok(p) => p,
            Err(e) => return Ok(ImportOutcome::FileError(e)),
        };
        let mut errors = parsed.errors;

        // Members are matched by email against the tenant roster. Funds stay
        // names here; the repository resolves or creates them inside the
        // insert transaction so a rejected batch creates nothing.
        let email_index = self.members.email_index(church_id).await?;
        let mut inserts: Vec<ContributionInsert> = Vec::with_capacity(parsed.rows.len());
        for row in parsed.rows {
            let member_id = match email_index.get(&row.member_email) {
                Some(id) => *id,
                None => {
                    errors.push(RowError {
                        row: row.row,
                        message: format!("no member with email {}", row.member_email),
                    });
                    continue;
                }
            };
            inserts.push(ContributionInsert {
                member_id,
                fund_name: row.fund,
                amount: row.amount,
                received_on: row.received_on,
                method: row.method,
                note: row.note,
            });
        }
        errors.sort_by_key(|e| e.row);

        if !errors.is_empty() && !partial {
            return Ok(ImportOutcome::Rejected {
                total_rows: parsed.total_rows,
                errors,
            });
        }

        let imported = if inserts.is_empty() {
            0
        } else {
            self.imports
                .insert_contributions(church_id, &inserts)
                .await?
        };
        Ok(ImportOutcome::Committed {
            imported,
            total_rows: parsed.total_rows,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::application::ports::import_repository::MemberInsert;
    use crate::application::ports::member_repository::{MemberFilter, NewMember};
    use crate::domain::members::Member;

    struct FakeImports {
        batches: Mutex<Vec<Vec<ContributionInsert>>>,
    }

    #[async_trait]
    impl ImportRepository for FakeImports {
        async fn insert_members(
            &self,
            _church_id: Uuid,
            _rows: &[MemberInsert],
        ) -> anyhow::Result<u64> {
            unimplemented!()
        }

        async fn insert_contributions(
            &self,
            _church_id: Uuid,
            rows: &[ContributionInsert],
        ) -> anyhow::Result<u64> {
            self.batches.lock().unwrap().push(rows.to_vec());
            Ok(rows.len() as u64)
        }
    }

    struct FakeMembers {
        emails: HashMap<String, Uuid>,
    }

    #[async_trait]
    impl MemberRepository for FakeMembers {
        async fn create_member(&self, _: Uuid, _: &NewMember) -> anyhow::Result<Member> {
            unimplemented!()
        }
        async fn update_member(
            &self,
            _: Uuid,
            _: Uuid,
            _: &NewMember,
        ) -> anyhow::Result<Option<Member>> {
            unimplemented!()
        }
        async fn get_member(&self, _: Uuid, _: Uuid) -> anyhow::Result<Option<Member>> {
            unimplemented!()
        }
        async fn list_members(&self, _: Uuid, _: &MemberFilter) -> anyhow::Result<Vec<Member>> {
            unimplemented!()
        }
        async fn count_members(&self, _: Uuid) -> anyhow::Result<i64> {
            unimplemented!()
        }
        async fn has_history(&self, _: Uuid, _: Uuid) -> anyhow::Result<bool> {
            unimplemented!()
        }
        async fn delete_member(&self, _: Uuid, _: Uuid) -> anyhow::Result<bool> {
            unimplemented!()
        }
        async fn email_index(&self, _: Uuid) -> anyhow::Result<HashMap<String, Uuid>> {
            Ok(self.emails.clone())
        }
    }

    const CSV: &[u8] = b"member_email,fund,amount,received_on\n\
        ann@example.com,General Fund,25.00,2024-03-10\n\
        nobody@example.com,Missions,10.00,2024-03-11\n";

    fn fakes() -> (FakeImports, FakeMembers) {
        let imports = FakeImports {
            batches: Mutex::new(Vec::new()),
        };
        let members = FakeMembers {
            emails: HashMap::from([("ann@example.com".to_string(), Uuid::new_v4())]),
        };
        (imports, members)
    }

    #[tokio::test]
    async fn rejected_import_writes_nothing() {
        let (imports, members) = fakes();
        let uc = ImportContributions {
            imports: &imports,
            members: &members,
        };
        let outcome = uc.execute(Uuid::new_v4(), CSV, false).await.unwrap();
        match outcome {
            ImportOutcome::Rejected { total_rows, errors } => {
                assert_eq!(total_rows, 2);
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].row, 2);
            }
            _ => panic!("expected Rejected"),
        }
        assert!(imports.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_import_commits_valid_rows_by_fund_name() {
        let (imports, members) = fakes();
        let uc = ImportContributions {
            imports: &imports,
            members: &members,
        };
        let outcome = uc.execute(Uuid::new_v4(), CSV, true).await.unwrap();
        match outcome {
            ImportOutcome::Committed {
                imported, errors, ..
            } => {
                assert_eq!(imported, 1);
                assert_eq!(errors.len(), 1);
            }
            _ => panic!("expected Committed"),
        }
        let batches = imports.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].fund_name, "General Fund");
        assert_eq!(
            batches[0][0].received_on,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
    }
}
