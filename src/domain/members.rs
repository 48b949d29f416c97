use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Member {
    pub id: Uuid,
    pub church_id: Uuid,
    pub household_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub participation_status: ParticipationStatus,
    pub joined_on: Option<NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Membership state used for filtering rosters and reports. `Deceased` and
/// `Moved` members are kept for history but drop out of default report
/// filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    Active,
    Inactive,
    Visitor,
    Deceased,
    Moved,
}

impl ParticipationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Active => "active",
            ParticipationStatus::Inactive => "inactive",
            ParticipationStatus::Visitor => "visitor",
            ParticipationStatus::Deceased => "deceased",
            ParticipationStatus::Moved => "moved",
        }
    }

    pub fn parse(s: &str) -> Option<ParticipationStatus> {
        match s {
            "active" => Some(ParticipationStatus::Active),
            "inactive" => Some(ParticipationStatus::Inactive),
            "visitor" => Some(ParticipationStatus::Visitor),
            "deceased" => Some(ParticipationStatus::Deceased),
            "moved" => Some(ParticipationStatus::Moved),
            _ => None,
        }
    }

    /// Whether the status is included when no explicit filter is given.
    pub fn in_default_reports(&self) -> bool {
        !matches!(
            self,
            ParticipationStatus::Deceased | ParticipationStatus::Moved
        )
    }
}
