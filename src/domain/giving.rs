use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A giving category. Only tax-deductible funds count toward statements.
#[derive(Debug, Clone)]
pub struct Fund {
    pub id: Uuid,
    pub church_id: Uuid,
    pub name: String,
    pub tax_deductible: bool,
}

#[derive(Debug, Clone)]
pub struct Contribution {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub fund_id: Uuid,
    pub fund_name: String,
    pub amount: Decimal,
    pub received_on: NaiveDate,
    pub method: GivingMethod,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GivingMethod {
    Cash,
    Check,
    Card,
    Ach,
    Other,
}

impl GivingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GivingMethod::Cash => "cash",
            GivingMethod::Check => "check",
            GivingMethod::Card => "card",
            GivingMethod::Ach => "ach",
            GivingMethod::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<GivingMethod> {
        match s {
            "cash" => Some(GivingMethod::Cash),
            "check" => Some(GivingMethod::Check),
            "card" => Some(GivingMethod::Card),
            "ach" => Some(GivingMethod::Ach),
            "other" => Some(GivingMethod::Other),
            _ => None,
        }
    }
}

/// Record of a generated annual statement. The PDF itself is rendered on
/// demand from live contribution rows.
#[derive(Debug, Clone)]
pub struct GivingStatement {
    pub id: Uuid,
    pub household_id: Uuid,
    pub household_name: String,
    pub year: i32,
    pub total_amount: Decimal,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
