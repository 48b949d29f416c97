pub mod create_fund;
pub mod list_contributions;
pub mod list_funds;
pub mod record_contribution;
