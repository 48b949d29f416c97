use uuid::Uuid;

/// A family unit sharing an address. Giving statements are issued per
/// household.
#[derive(Debug, Clone)]
pub struct Household {
    pub id: Uuid,
    pub church_id: Uuid,
    pub name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Household {
    /// Mailing-address lines in print order, blanks skipped.
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(l1) = self.address_line1.as_deref().filter(|s| !s.is_empty()) {
            lines.push(l1.to_string());
        }
        if let Some(l2) = self.address_line2.as_deref().filter(|s| !s.is_empty()) {
            lines.push(l2.to_string());
        }
        let city_line: Vec<&str> = [
            self.city.as_deref(),
            self.state.as_deref(),
            self.postal_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
        if !city_line.is_empty() {
            lines.push(city_line.join(", "));
        }
        lines
    }
}
