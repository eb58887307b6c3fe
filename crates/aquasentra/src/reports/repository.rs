use super::domain::{HazardReport, NewReport, ReportId, ReportStatus};

/// Storage abstraction so the lifecycle service can be exercised in isolation.
pub trait ReportRepository: Send + Sync {
    /// Persist a new report, assigning its id and timestamps.
    fn insert(&self, report: NewReport) -> Result<HazardReport, RepositoryError>;

    fn find_by_id(&self, id: &ReportId) -> Result<Option<HazardReport>, RepositoryError>;

    /// Reports with the given status, newest first.
    fn find_by_status(&self, status: ReportStatus) -> Result<Vec<HazardReport>, RepositoryError>;

    /// Move a report from `expected` to `next`.
    ///
    /// Fails with [`RepositoryError::StatusMismatch`] when the stored status is no
    /// longer `expected`; the check and the write happen atomically.
    fn update_status(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        next: ReportStatus,
    ) -> Result<HazardReport, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record status is {}", .current.label())]
    StatusMismatch { current: ReportStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
