pub mod accept_invitation;
pub mod create_invitation;
pub mod list_invitations;
