//! Role capability table.
//!
//! Every role-sensitive operation is listed in [`Operation`] and checked at
//! exactly one chokepoint, [`authorize`], before any state is touched. The
//! table is the single source of truth for who may do what.

use std::fmt;

use tracing::warn;

use crate::error::{AuditError, Result};
use crate::types::{Role, User};

/// Operations exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create an audit and its checklist.
    CreateAudit,
    /// Record compliance, observation or evidence on an item.
    RecordCompliance,
    /// Open (get or create) the remediation plan of an item.
    OpenPlan,
    /// Assign responsibles or dates on a plan.
    AssignPlan,
    /// Move a plan to another state.
    SetPlanState,
    /// Grant a new close date.
    ReprogramPlan,
    /// Verify and close a plan.
    VerifyPlan,
    /// Edit free-text plan fields (description, evidence, closure comment).
    AnnotatePlan,
    /// Add a standard to the catalog.
    AddStandard,
}

impl Operation {
    /// Short human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAudit => "create audit",
            Self::RecordCompliance => "record compliance",
            Self::OpenPlan => "open plan",
            Self::AssignPlan => "assign plan",
            Self::SetPlanState => "set plan state",
            Self::ReprogramPlan => "reprogram plan",
            Self::VerifyPlan => "verify plan",
            Self::AnnotatePlan => "annotate plan",
            Self::AddStandard => "add standard",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a capability lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The role may perform the operation.
    Allow,
    /// The role may not perform the operation.
    Deny,
}

/// Look up the capability table for `(operation, role)`.
pub fn decide(operation: Operation, role: Role) -> PolicyDecision {
    let allowed = match operation {
        Operation::CreateAudit | Operation::ReprogramPlan | Operation::VerifyPlan => {
            role == Role::Auditor
        }
        Operation::AssignPlan | Operation::SetPlanState => role == Role::AreaManager,
        Operation::AddStandard => role == Role::OperationalExcellence,
        // Open to every role.
        Operation::RecordCompliance | Operation::OpenPlan | Operation::AnnotatePlan => true,
    };
    if allowed {
        PolicyDecision::Allow
    } else {
        PolicyDecision::Deny
    }
}

/// Check that `actor` may perform `operation`.
///
/// # Errors
///
/// Returns [`AuditError::Permission`] when the table denies the role.
pub fn authorize(actor: &User, operation: Operation) -> Result<()> {
    match decide(operation, actor.role) {
        PolicyDecision::Allow => Ok(()),
        PolicyDecision::Deny => {
            warn!(
                user = %actor.email,
                role = %actor.role,
                operation = %operation,
                "operation denied by role policy"
            );
            Err(AuditError::Permission {
                operation,
                role: actor.role,
            })
        }
    }
}
