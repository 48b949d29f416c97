use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::application::ports::invitation_repository::InvitationRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct AcceptInvitation<'a, I, U>
where
    I: InvitationRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub invitations: &'a I,
    pub users: &'a U,
}

pub enum AcceptOutcome {
    Created(UserRow),
    NotFound,
    Expired,
    AlreadyUsed,
    EmailTaken,
}

impl<'a, I, U> AcceptInvitation<'a, I, U>
where
    I: InvitationRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub async fn execute(
        &self,
        church_id: Uuid,
        token: &str,
        name: &str,
        password: &str,
    ) -> anyhow::Result<AcceptOutcome> {
        let invitation = match self.invitations.find_by_token(token.trim()).await? {
            // A token minted for another tenant is indistinguishable from a
            // missing one.
            Some(inv) if inv.church_id == church_id => inv,
            _ => return Ok(AcceptOutcome::NotFound),
        };
        if invitation.accepted_at.is_some() {
            return Ok(AcceptOutcome::AlreadyUsed);
        }
        if invitation.expires_at < Utc::now() {
            return Ok(AcceptOutcome::Expired);
        }
        // Checked before claiming the token: a duplicate email must not burn
        // an otherwise valid invitation.
        if self
            .users
            .find_by_email(church_id, &invitation.email)
            .await?
            .is_some()
        {
            return Ok(AcceptOutcome::EmailTaken);
        }

        // Claim the token before creating the user so two concurrent accepts
        // cannot both succeed.
        if !self.invitations.mark_accepted(invitation.id).await? {
            return Ok(AcceptOutcome::AlreadyUsed);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        let user = self
            .users
            .create_user(
                church_id,
                &invitation.email,
                name.trim(),
                &hash,
                &invitation.role,
            )
            .await?;
        Ok(AcceptOutcome::Created(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    use crate::application::ports::invitation_repository::InvitationRow;

    struct FakeInvitations {
        row: Mutex<InvitationRow>,
    }

    #[async_trait]
    impl InvitationRepository for FakeInvitations {
        async fn create_invitation(
            &self,
            _: Uuid,
            _: &str,
            _: &str,
            _: &str,
            _: chrono::DateTime<Utc>,
        ) -> anyhow::Result<InvitationRow> {
            unimplemented!()
        }
        async fn list_pending(&self, _: Uuid) -> anyhow::Result<Vec<InvitationRow>> {
            unimplemented!()
        }
        async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<InvitationRow>> {
            let row = self.row.lock().unwrap().clone();
            Ok((row.token == token).then_some(row))
        }
        async fn mark_accepted(&self, id: Uuid) -> anyhow::Result<bool> {
            let mut row = self.row.lock().unwrap();
            if row.id != id || row.accepted_at.is_some() {
                return Ok(false);
            }
            row.accepted_at = Some(Utc::now());
            Ok(true)
        }
    }

    struct FakeUsers {
        existing_email: Option<String>,
        created: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UserRepository for FakeUsers {
        async fn create_user(
            &self,
            church_id: Uuid,
            email: &str,
            name: &str,
            password_hash: &str,
            role: &str,
        ) -> anyhow::Result<UserRow> {
            self.created.lock().unwrap().push(email.to_string());
            Ok(UserRow {
                id: Uuid::new_v4(),
                church_id,
                email: email.to_string(),
                name: name.to_string(),
                role: role.to_string(),
                password_hash: Some(password_hash.to_string()),
            })
        }
        async fn find_by_email(
            &self,
            church_id: Uuid,
            email: &str,
        ) -> anyhow::Result<Option<UserRow>> {
            Ok(self
                .existing_email
                .as_deref()
                .filter(|e| *e == email)
                .map(|e| UserRow {
                    id: Uuid::new_v4(),
                    church_id,
                    email: e.to_string(),
                    name: "Existing".to_string(),
                    role: "staff".to_string(),
                    password_hash: None,
                }))
        }
        async fn find_by_id(&self, _: Uuid) -> anyhow::Result<Option<UserRow>> {
            unimplemented!()
        }
    }

    fn open_invitation(church_id: Uuid) -> InvitationRow {
        InvitationRow {
            id: Uuid::new_v4(),
            church_id,
            email: "newcomer@example.com".to_string(),
            role: "staff".to_string(),
            token: "tok123".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            accepted_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn accepting_creates_the_user_and_claims_the_token() {
        let church_id = Uuid::new_v4();
        let invitations = FakeInvitations {
            row: Mutex::new(open_invitation(church_id)),
        };
        let users = FakeUsers {
            existing_email: None,
            created: Mutex::new(Vec::new()),
        };
        let uc = AcceptInvitation {
            invitations: &invitations,
            users: &users,
        };
        let outcome = uc
            .execute(church_id, "tok123", "New Comer", "hunter2hunter2")
            .await
            .unwrap();
        assert!(matches!(outcome, AcceptOutcome::Created(_)));
        assert!(invitations.row.lock().unwrap().accepted_at.is_some());
    }

    #[tokio::test]
    async fn a_duplicate_email_does_not_burn_the_invitation() {
        let church_id = Uuid::new_v4();
        let invitations = FakeInvitations {
            row: Mutex::new(open_invitation(church_id)),
        };
        let users = FakeUsers {
            existing_email: Some("newcomer@example.com".to_string()),
            created: Mutex::new(Vec::new()),
        };
        let uc = AcceptInvitation {
            invitations: &invitations,
            users: &users,
        };
        let outcome = uc
            .execute(church_id, "tok123", "New Comer", "hunter2hunter2")
            .await
            .unwrap();
        assert!(matches!(outcome, AcceptOutcome::EmailTaken));
        // The token stays open for a retry under a different account.
        assert!(invitations.row.lock().unwrap().accepted_at.is_none());
        assert!(users.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn a_foreign_tenant_token_reads_as_missing() {
        let invitations = FakeInvitations {
            row: Mutex::new(open_invitation(Uuid::new_v4())),
        };
        let users = FakeUsers {
            existing_email: None,
            created: Mutex::new(Vec::new()),
        };
        let uc = AcceptInvitation {
            invitations: &invitations,
            users: &users,
        };
        let outcome = uc
            .execute(Uuid::new_v4(), "tok123", "New Comer", "hunter2hunter2")
            .await
            .unwrap();
        assert!(matches!(outcome, AcceptOutcome::NotFound));
    }
}
