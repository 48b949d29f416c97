pub mod attendance_repository;
pub mod billing_repository;
pub mod giving_repository;
pub mod household_repository;
pub mod import_repository;
pub mod invitation_repository;
pub mod mail_gateway;
pub mod member_repository;
pub mod payment_gateway;
pub mod statement_repository;
pub mod tenant_repository;
pub mod user_repository;
