use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use bursary_domain::principal::WARD_ROLE;
use bursary_domain::stage::Stage;
use bursary_domain::workflow::ApprovalTable;

use crate::domain::repository::{ApplicationRepository, BursaryRepository, RoleRepository};
use crate::domain::types::{Application, ApplicationDetails, Caller, StudentApplication};
use crate::error::ApiError;
use crate::usecase::access::AuthorizationGate;

// ── CreateApplication ────────────────────────────────────────────────────────

/// A student applies to a bursary. The application starts at `submitted`; a second
/// active application to the same bursary is rejected.
pub struct CreateApplicationUseCase<A, B>
where
    A: ApplicationRepository,
    B: BursaryRepository,
{
    pub applications: A,
    pub bursaries: B,
}

impl<A, B> CreateApplicationUseCase<A, B>
where
    A: ApplicationRepository,
    B: BursaryRepository,
{
    pub async fn execute(&self, caller: &Caller, bursary_id: Uuid) -> Result<Application, ApiError> {
        if !caller.is_student() {
            return Err(ApiError::Forbidden);
        }

        self.bursaries
            .find_by_id(bursary_id)
            .await?
            .ok_or(ApiError::BursaryNotFound)?;

        if self
            .applications
            .find_active(caller.id(), bursary_id)
            .await?
            .is_some()
        {
            return Err(ApiError::ApplicationAlreadyExists);
        }

        let now = Utc::now();
        let application = Application {
            id: Uuid::now_v7(),
            bursary_id,
            student_id: caller.id(),
            stage: Stage::Submitted,
            remarks: None,
            soft_delete: false,
            created_at: now,
            updated_at: now,
        };
        self.applications.create(&application).await?;

        info!(application_id = %application.id, %bursary_id, student_id = %caller.id(), "application submitted");
        Ok(application)
    }
}

// ── WithdrawApplication ──────────────────────────────────────────────────────

/// Soft-delete the caller's active application(s) to a bursary.
pub struct WithdrawApplicationUseCase<A>
where
    A: ApplicationRepository,
{
    pub applications: A,
}

impl<A> WithdrawApplicationUseCase<A>
where
    A: ApplicationRepository,
{
    pub async fn execute(&self, caller: &Caller, bursary_id: Uuid) -> Result<u64, ApiError> {
        if !caller.is_student() {
            return Err(ApiError::Forbidden);
        }

        let withdrawn = self
            .applications
            .withdraw(caller.id(), bursary_id, Utc::now())
            .await?;
        if withdrawn == 0 {
            return Err(ApiError::ApplicationNotFound);
        }

        info!(%bursary_id, student_id = %caller.id(), withdrawn, "application withdrawn");
        Ok(withdrawn)
    }
}

// ── ListApplicationsForReviewer ──────────────────────────────────────────────

/// Applications waiting on the caller's role: those at the stage the role approves from.
/// Roles that cannot approve see nothing.
pub struct ListReviewQueueUseCase<A>
where
    A: ApplicationRepository,
{
    pub applications: A,
    pub table: Arc<ApprovalTable>,
}

impl<A> ListReviewQueueUseCase<A>
where
    A: ApplicationRepository,
{
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<ApplicationDetails>, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden);
        }
        match self.table.reviewing_stage(caller.role_name()) {
            Some(stage) => self.applications.list_by_stage(stage).await,
            None => Ok(vec![]),
        }
    }
}

// ── GetApplicationDetails ────────────────────────────────────────────────────

/// Full view of one application. The owning student may always read it; admins need at
/// least the ward role. A student asking for someone else's application gets
/// `ApplicationNotFound`, the same as for an id that does not exist.
pub struct GetApplicationDetailsUseCase<A, R>
where
    A: ApplicationRepository,
    R: RoleRepository,
{
    pub applications: A,
    pub gate: AuthorizationGate<R>,
}

impl<A, R> GetApplicationDetailsUseCase<A, R>
where
    A: ApplicationRepository,
    R: RoleRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        application_id: Uuid,
    ) -> Result<ApplicationDetails, ApiError> {
        if !caller.is_student() {
            self.gate.authorize(caller, WARD_ROLE, false).await?;
        }

        let details = self
            .applications
            .get_details(application_id)
            .await?
            .ok_or(ApiError::ApplicationNotFound)?;

        if caller.is_student() && details.application.student_id != caller.id() {
            return Err(ApiError::ApplicationNotFound);
        }
        Ok(details)
    }
}

// ── ListStudentApplications ──────────────────────────────────────────────────

pub struct ListStudentApplicationsUseCase<A>
where
    A: ApplicationRepository,
{
    pub applications: A,
}

impl<A> ListStudentApplicationsUseCase<A>
where
    A: ApplicationRepository,
{
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<StudentApplication>, ApiError> {
        if !caller.is_student() {
            return Err(ApiError::Forbidden);
        }
        self.applications.list_by_student(caller.id()).await
    }
}
