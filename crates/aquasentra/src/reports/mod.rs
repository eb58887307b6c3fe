//! Hazard report submission and moderation.
//!
//! Reports enter as `pending` and move exactly once to `approved` or
//! `rejected` on a verifier's decision.

pub mod domain;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Decision, HazardReport, NewReport, Principal, PrincipalId, ReportDetails, ReportId,
    ReportStatus, Role, Severity,
};
pub use policy::{authorize, Access, Operation};
pub use repository::{ReportRepository, RepositoryError};
pub use router::report_router;
pub use service::{ReportLifecycleService, ReportServiceError};
pub use store::InMemoryReportRepository;
pub use validation::{FieldError, ReportSubmission, ValidationError};
