use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use bursary_domain::stage::Stage;
use bursary_domain::workflow::{ApprovalTable, StagePolicy, transition};

use crate::domain::repository::ApplicationRepository;
use crate::domain::types::Caller;
use crate::error::ApiError;

// ── ApproveApplication ───────────────────────────────────────────────────────

/// Advance an application to the stage mapped to the caller's role.
///
/// The new stage comes from the pure [`transition`]; the write is conditional on the
/// application still being at the stage it was read at, so two concurrent approvals
/// cannot silently overwrite each other.
pub struct ApproveApplicationUseCase<A>
where
    A: ApplicationRepository,
{
    pub applications: A,
    pub table: Arc<ApprovalTable>,
    pub policy: StagePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub application_id: Uuid,
    pub from: Stage,
    pub to: Stage,
}

pub const MAX_BULK_APPROVALS: usize = 100;

/// Per-id result of a bulk approval.
#[derive(Debug)]
pub struct BulkApprovalResult {
    pub application_id: Uuid,
    pub outcome: Result<ApprovalOutcome, ApiError>,
}

impl<A> ApproveApplicationUseCase<A>
where
    A: ApplicationRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        application_id: Uuid,
    ) -> Result<ApprovalOutcome, ApiError> {
        self.ensure_approver(caller)?;
        self.approve_one(caller, application_id).await
    }

    /// Approve each id independently. A failure on one id is reported in its slot and
    /// does not stop the rest. Duplicate ids are approved once.
    pub async fn execute_many(
        &self,
        caller: &Caller,
        application_ids: &[Uuid],
    ) -> Result<Vec<BulkApprovalResult>, ApiError> {
        self.ensure_approver(caller)?;
        if application_ids.is_empty() {
            return Err(ApiError::InvalidInput("ids must not be empty".to_owned()));
        }
        if application_ids.len() > MAX_BULK_APPROVALS {
            return Err(ApiError::InvalidInput(format!(
                "at most {MAX_BULK_APPROVALS} ids per request"
            )));
        }

        let mut seen = HashSet::with_capacity(application_ids.len());
        let mut results = Vec::with_capacity(application_ids.len());
        for &application_id in application_ids {
            if !seen.insert(application_id) {
                continue;
            }
            let outcome = self.approve_one(caller, application_id).await;
            if let Err(e) = &outcome {
                warn!(%application_id, error = %e, "bulk approval skipped application");
            }
            results.push(BulkApprovalResult {
                application_id,
                outcome,
            });
        }
        Ok(results)
    }

    fn ensure_approver(&self, caller: &Caller) -> Result<(), ApiError> {
        if !caller.is_admin() || self.table.target_for(caller.role_name()).is_none() {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }

    async fn approve_one(
        &self,
        caller: &Caller,
        application_id: Uuid,
    ) -> Result<ApprovalOutcome, ApiError> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or(ApiError::ApplicationNotFound)?;

        let current = application.stage;
        let target = transition(&self.table, self.policy, current, caller.role_name())?;

        let updated = self
            .applications
            .update_stage(application_id, current, target, Utc::now())
            .await?;
        if !updated {
            return Err(ApiError::StageConflict);
        }

        info!(
            %application_id,
            admin_id = %caller.id(),
            role = caller.role_name(),
            from = %current,
            to = %target,
            "application approved"
        );
        Ok(ApprovalOutcome {
            application_id,
            from: current,
            to: target,
        })
    }
}

// ── RejectApplication ────────────────────────────────────────────────────────

/// Record a reviewer's remark on an application. The stage is left untouched.
pub struct RejectApplicationUseCase<A>
where
    A: ApplicationRepository,
{
    pub applications: A,
    pub table: Arc<ApprovalTable>,
}

impl<A> RejectApplicationUseCase<A>
where
    A: ApplicationRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        application_id: Uuid,
        remarks: Option<String>,
    ) -> Result<(), ApiError> {
        if !caller.is_admin() || self.table.target_for(caller.role_name()).is_none() {
            return Err(ApiError::Forbidden);
        }

        let remarks = remarks
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty());
        let updated = self
            .applications
            .set_remarks(application_id, remarks, Utc::now())
            .await?;
        if !updated {
            return Err(ApiError::ApplicationNotFound);
        }

        info!(%application_id, admin_id = %caller.id(), "application rejected");
        Ok(())
    }
}
