use std::sync::Arc;

use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::application::ports::billing_repository::BillingRepository;
use crate::application::ports::giving_repository::GivingRepository;
use crate::application::ports::household_repository::HouseholdRepository;
use crate::application::ports::import_repository::ImportRepository;
use crate::application::ports::invitation_repository::InvitationRepository;
use crate::application::ports::mail_gateway::MailGateway;
use crate::application::ports::member_repository::MemberRepository;
use crate::application::ports::payment_gateway::PaymentGateway;
use crate::application::ports::statement_repository::StatementRepository;
use crate::application::ports::tenant_repository::TenantRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    tenant_repo: Arc<dyn TenantRepository>,
    user_repo: Arc<dyn UserRepository>,
    invitation_repo: Arc<dyn InvitationRepository>,
    member_repo: Arc<dyn MemberRepository>,
    household_repo: Arc<dyn HouseholdRepository>,
    attendance_repo: Arc<dyn AttendanceRepository>,
    giving_repo: Arc<dyn GivingRepository>,
    statement_repo: Arc<dyn StatementRepository>,
    import_repo: Arc<dyn ImportRepository>,
    billing_repo: Arc<dyn BillingRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
    mail_gateway: Arc<dyn MailGateway>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_repo: Arc<dyn TenantRepository>,
        user_repo: Arc<dyn UserRepository>,
        invitation_repo: Arc<dyn InvitationRepository>,
        member_repo: Arc<dyn MemberRepository>,
        household_repo: Arc<dyn HouseholdRepository>,
        attendance_repo: Arc<dyn AttendanceRepository>,
        giving_repo: Arc<dyn GivingRepository>,
        statement_repo: Arc<dyn StatementRepository>,
        import_repo: Arc<dyn ImportRepository>,
        billing_repo: Arc<dyn BillingRepository>,
        payment_gateway: Arc<dyn PaymentGateway>,
        mail_gateway: Arc<dyn MailGateway>,
    ) -> Self {
        Self {
            tenant_repo,
            user_repo,
            invitation_repo,
            member_repo,
            household_repo,
            attendance_repo,
            giving_repo,
            statement_repo,
            import_repo,
            billing_repo,
            payment_gateway,
            mail_gateway,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn tenant_repo(&self) -> Arc<dyn TenantRepository> {
        self.services.tenant_repo.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn invitation_repo(&self) -> Arc<dyn InvitationRepository> {
        self.services.invitation_repo.clone()
    }

    pub fn member_repo(&self) -> Arc<dyn MemberRepository> {
        self.services.member_repo.clone()
    }

    pub fn household_repo(&self) -> Arc<dyn HouseholdRepository> {
        self.services.household_repo.clone()
    }

    pub fn attendance_repo(&self) -> Arc<dyn AttendanceRepository> {
        self.services.attendance_repo.clone()
    }

    pub fn giving_repo(&self) -> Arc<dyn GivingRepository> {
        self.services.giving_repo.clone()
    }

    pub fn statement_repo(&self) -> Arc<dyn StatementRepository> {
        self.services.statement_repo.clone()
    }

    pub fn import_repo(&self) -> Arc<dyn ImportRepository> {
        self.services.import_repo.clone()
    }

    pub fn billing_repo(&self) -> Arc<dyn BillingRepository> {
        self.services.billing_repo.clone()
    }

    pub fn payment_gateway(&self) -> Arc<dyn PaymentGateway> {
        self.services.payment_gateway.clone()
    }

    pub fn mail_gateway(&self) -> Arc<dyn MailGateway> {
        self.services.mail_gateway.clone()
    }
}
