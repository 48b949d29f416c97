use crate::domain::tenancy::{PlanTier, Role};

/// Actions gated by staff role. Checked before plan gates; a failed role
/// check is 403, a failed plan check is 402.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewRecords,
    ManageRecords,
    ManageFunds,
    ImportData,
    GenerateStatements,
    ManageInvitations,
    DeleteMembers,
    ManageBilling,
}

pub fn role_allows(role: Role, action: Action) -> bool {
    let minimum = match action {
        Action::ViewRecords => Role::Viewer,
        Action::ManageRecords => Role::Staff,
        Action::ManageFunds
        | Action::ImportData
        | Action::GenerateStatements
        | Action::ManageInvitations
        | Action::DeleteMembers => Role::Admin,
        Action::ManageBilling => Role::Owner,
    };
    role >= minimum
}

/// Features gated by subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFeature {
    CsvImport,
    GivingStatements,
}

/// Cheapest plan that includes the feature; surfaced in 402 responses so the
/// caller knows what to upgrade to.
pub fn feature_minimum(feature: PlanFeature) -> PlanTier {
    match feature {
        PlanFeature::CsvImport | PlanFeature::GivingStatements => PlanTier::Standard,
    }
}

pub fn plan_allows(plan: PlanTier, feature: PlanFeature) -> bool {
    plan >= feature_minimum(feature)
}

/// The tier above the given one, for cap-exceeded upgrade hints.
pub fn next_plan(plan: PlanTier) -> Option<PlanTier> {
    match plan {
        PlanTier::Starter => Some(PlanTier::Standard),
        PlanTier::Standard => Some(PlanTier::Growth),
        PlanTier::Growth => None,
    }
}

/// Maximum member records for the plan; `None` means uncapped.
pub fn member_cap(plan: PlanTier) -> Option<i64> {
    match plan {
        PlanTier::Starter => Some(250),
        PlanTier::Standard => Some(1_000),
        PlanTier::Growth => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_table_is_monotonic() {
        assert!(role_allows(Role::Viewer, Action::ViewRecords));
        assert!(!role_allows(Role::Viewer, Action::ManageRecords));
        assert!(role_allows(Role::Staff, Action::ManageRecords));
        assert!(!role_allows(Role::Staff, Action::ImportData));
        assert!(role_allows(Role::Admin, Action::GenerateStatements));
        assert!(!role_allows(Role::Admin, Action::ManageBilling));
        assert!(role_allows(Role::Owner, Action::ManageBilling));
    }

    #[test]
    fn plan_gates() {
        assert!(!plan_allows(PlanTier::Starter, PlanFeature::CsvImport));
        assert!(plan_allows(PlanTier::Standard, PlanFeature::CsvImport));
        assert!(plan_allows(PlanTier::Growth, PlanFeature::GivingStatements));
    }

    #[test]
    fn upgrade_hints_name_the_right_tier() {
        assert_eq!(feature_minimum(PlanFeature::CsvImport), PlanTier::Standard);
        assert_eq!(
            feature_minimum(PlanFeature::GivingStatements),
            PlanTier::Standard
        );
        assert_eq!(next_plan(PlanTier::Starter), Some(PlanTier::Standard));
        assert_eq!(next_plan(PlanTier::Standard), Some(PlanTier::Growth));
        assert_eq!(next_plan(PlanTier::Growth), None);
    }

    #[test]
    fn member_caps() {
        assert_eq!(member_cap(PlanTier::Starter), Some(250));
        assert_eq!(member_cap(PlanTier::Standard), Some(1_000));
        assert_eq!(member_cap(PlanTier::Growth), None);
    }
}
