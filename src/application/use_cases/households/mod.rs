pub mod create_household;
pub mod delete_household;
pub mod get_household;
pub mod list_households;
pub mod update_household;
