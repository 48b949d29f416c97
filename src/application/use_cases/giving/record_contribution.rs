use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::giving_repository::{GivingRepository, NewContribution};
use crate::application::ports::member_repository::MemberRepository;
use crate::domain::giving::Contribution;

pub struct RecordContribution<'a, G, M>
where
    G: GivingRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    pub giving: &'a G,
    pub members: &'a M,
}

pub enum RecordContributionOutcome {
    Recorded(Contribution),
    MemberNotFound,
    FundNotFound,
    AmountNotPositive,
}

impl<'a, G, M> RecordContribution<'a, G, M>
where
    G: GivingRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    pub async fn execute(
        &self,
        church_id: Uuid,
        new: &NewContribution,
    ) -> anyhow::Result<RecordContributionOutcome> {
        if new.amount <= Decimal::ZERO {
            return Ok(RecordContributionOutcome::AmountNotPositive);
        }
        if self
            .members
            .get_member(church_id, new.member_id)
            .await?
            .is_none()
        {
            return Ok(RecordContributionOutcome::MemberNotFound);
        }
        if self.giving.find_fund(church_id, new.fund_id).await?.is_none() {
            return Ok(RecordContributionOutcome::FundNotFound);
        }
        let rounded = NewContribution {
            amount: new.amount.round_dp(2),
            ..new.clone()
        };
        let contribution = self.giving.create_contribution(church_id, &rounded).await?;
        Ok(RecordContributionOutcome::Recorded(contribution))
    }
}
