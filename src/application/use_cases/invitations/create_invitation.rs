use chrono::{Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::application::ports::invitation_repository::{InvitationRepository, InvitationRow};
use crate::application::ports::mail_gateway::{MailGateway, OutboundEmail};
use crate::domain::tenancy::{Church, Role};

const TOKEN_LEN: usize = 32;
const EXPIRY_DAYS: i64 = 7;

pub struct CreateInvitation<'a, I, M>
where
    I: InvitationRepository + ?Sized,
    M: MailGateway + ?Sized,
{
    pub invitations: &'a I,
    pub mail: &'a M,
}

pub enum CreateInvitationOutcome {
    Created(InvitationRow),
    /// An inviter cannot grant a role above their own.
    RoleTooHigh,
}

impl<'a, I, M> CreateInvitation<'a, I, M>
where
    I: InvitationRepository + ?Sized,
    M: MailGateway + ?Sized,
{
    pub async fn execute(
        &self,
        church: &Church,
        base_domain: &str,
        inviter_role: Role,
        email: &str,
        role: Role,
    ) -> anyhow::Result<CreateInvitationOutcome> {
        if role > inviter_role {
            return Ok(CreateInvitationOutcome::RoleTooHigh);
        }

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        let expires_at = Utc::now() + Duration::days(EXPIRY_DAYS);
        let invitation = self
            .invitations
            .create_invitation(
                church.id,
                &email.trim().to_ascii_lowercase(),
                role.as_str(),
                &token,
                expires_at,
            )
            .await?;

        let accept_url = format!(
            "https://{}.{}/accept?token={}",
            church.subdomain, base_domain, token
        );
        let outbound = OutboundEmail {
            to: invitation.email.clone(),
            subject: format!("You've been invited to {}", church.name),
            body: format!(
                "You've been invited to join {} as {}.\n\nAccept the invitation: {}\n\nThis link expires in {} days.",
                church.name,
                role.as_str(),
                accept_url,
                EXPIRY_DAYS
            ),
        };
        // Mail delivery is best effort; the invitation stands either way.
        if let Err(e) = self.mail.send(&outbound).await {
            tracing::warn!(error = ?e, email = %invitation.email, "invitation_mail_failed");
        }

        Ok(CreateInvitationOutcome::Created(invitation))
    }
}
