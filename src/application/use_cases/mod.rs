pub mod attendance;
pub mod auth;
pub mod billing;
pub mod giving;
pub mod households;
pub mod imports;
pub mod invitations;
pub mod members;
pub mod reports;
pub mod statements;
