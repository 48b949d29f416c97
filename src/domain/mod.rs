pub mod attendance;
pub mod billing;
pub mod giving;
pub mod households;
pub mod members;
pub mod tenancy;
