pub mod attendance_repository_sqlx;
pub mod billing_repository_sqlx;
pub mod giving_repository_sqlx;
pub mod household_repository_sqlx;
pub mod import_repository_sqlx;
pub mod invitation_repository_sqlx;
pub mod member_repository_sqlx;
pub mod statement_repository_sqlx;
pub mod tenant_repository_sqlx;
pub mod user_repository_sqlx;
