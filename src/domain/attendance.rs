use chrono::NaiveDate;
use uuid::Uuid;

/// A recurring gathering (e.g. "Sunday 9:00", "Wednesday Prayer").
#[derive(Debug, Clone)]
pub struct Service {
    pub id: Uuid,
    pub church_id: Uuid,
    pub name: String,
    pub starts_at: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub member_id: Uuid,
    pub member_name: String,
    pub attended_on: NaiveDate,
}

/// Headcount for one service on one date.
#[derive(Debug, Clone)]
pub struct Headcount {
    pub attended_on: NaiveDate,
    pub service_name: String,
    pub count: i64,
}
