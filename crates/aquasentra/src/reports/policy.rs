use serde::Serialize;

use super::domain::Role;

/// Operations gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SubmitReport,
    ListApproved,
    ListPending,
    DecideReport,
}

impl Operation {
    pub const fn label(self) -> &'static str {
        match self {
            Operation::SubmitReport => "submit_report",
            Operation::ListApproved => "list_approved",
            Operation::ListPending => "list_pending",
            Operation::DecideReport => "decide_report",
        }
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

impl Access {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Access::Allowed)
    }
}

/// Decide whether `role` may perform `operation`. `None` is an anonymous caller.
pub const fn authorize(role: Option<Role>, operation: Operation) -> Access {
    match (operation, role) {
        (Operation::ListApproved, _) => Access::Allowed,
        (Operation::SubmitReport, Some(_)) => Access::Allowed,
        (Operation::ListPending | Operation::DecideReport, Some(Role::Verifier)) => {
            Access::Allowed
        }
        (Operation::SubmitReport, None)
        | (Operation::ListPending | Operation::DecideReport, Some(Role::Citizen) | None) => {
            Access::Denied
        }
    }
}
