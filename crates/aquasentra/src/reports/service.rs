use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Decision, HazardReport, NewReport, Principal, ReportId, ReportStatus};
use super::policy::{authorize, Operation};
use super::repository::{ReportRepository, RepositoryError};
use super::validation::{ReportSubmission, ValidationError};

/// Service owning the report state machine and its access checks.
pub struct ReportLifecycleService<R> {
    repository: Arc<R>,
}

impl<R> ReportLifecycleService<R>
where
    R: ReportRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and store a new report as pending, attributed to `principal`.
    pub fn submit(
        &self,
        principal: &Principal,
        submission: ReportSubmission,
    ) -> Result<HazardReport, ReportServiceError> {
        ensure_allowed(Some(principal), Operation::SubmitReport)?;
        let details = submission.validate()?;

        let stored = self.repository.insert(NewReport {
            details,
            created_by: principal.id.clone(),
            status: ReportStatus::Pending,
        })?;

        info!(report_id = %stored.id, created_by = %stored.created_by, "hazard report submitted");
        Ok(stored)
    }

    /// Approved reports, newest first. Open to anonymous callers.
    pub fn list_approved(&self) -> Result<Vec<HazardReport>, ReportServiceError> {
        ensure_allowed(None, Operation::ListApproved)?;
        Ok(self.repository.find_by_status(ReportStatus::Approved)?)
    }

    /// Pending reports, newest first. Verifiers only.
    pub fn list_pending(
        &self,
        principal: &Principal,
    ) -> Result<Vec<HazardReport>, ReportServiceError> {
        ensure_allowed(Some(principal), Operation::ListPending)?;
        Ok(self.repository.find_by_status(ReportStatus::Pending)?)
    }

    /// Apply a verifier's `decision` to a pending report.
    ///
    /// Checks run in order: role, decision value, existence, current status. The
    /// store write is conditional on the report still being pending, so of two
    /// racing decisions only one lands and the other reports a conflict.
    pub fn decide(
        &self,
        principal: &Principal,
        report_id: &ReportId,
        decision: &str,
    ) -> Result<HazardReport, ReportServiceError> {
        ensure_allowed(Some(principal), Operation::DecideReport)?;
        let decision: Decision = decision
            .parse()
            .map_err(ReportServiceError::InvalidArgument)?;

        let report = self
            .repository
            .find_by_id(report_id)?
            .ok_or_else(|| ReportServiceError::NotFound(report_id.clone()))?;

        let next = report
            .status
            .apply(decision)
            .ok_or_else(|| ReportServiceError::Conflict {
                id: report_id.clone(),
                status: report.status,
            })?;

        let updated = self
            .repository
            .update_status(report_id, report.status, next)
            .map_err(|error| match error {
                RepositoryError::StatusMismatch { current } => {
                    warn!(report_id = %report_id, current = current.label(), "decision lost race");
                    ReportServiceError::Conflict {
                        id: report_id.clone(),
                        status: current,
                    }
                }
                RepositoryError::NotFound => ReportServiceError::NotFound(report_id.clone()),
                other => ReportServiceError::Storage(other),
            })?;

        info!(
            report_id = %updated.id,
            verifier = %principal.id,
            status = updated.status.label(),
            "hazard report decided"
        );
        Ok(updated)
    }
}

fn ensure_allowed(
    principal: Option<&Principal>,
    operation: Operation,
) -> Result<(), ReportServiceError> {
    if authorize(principal.map(|p| p.role), operation).is_allowed() {
        Ok(())
    } else {
        Err(ReportServiceError::Forbidden { operation })
    }
}

/// Error raised by the report lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("access denied for {}", .operation.label())]
    Forbidden { operation: Operation },
    #[error("hazard report {0} not found")]
    NotFound(ReportId),
    #[error("hazard report {id} has already been processed ({})", .status.label())]
    Conflict { id: ReportId, status: ReportStatus },
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}
