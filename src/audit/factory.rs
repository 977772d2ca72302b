//! Audit creation.

use chrono::NaiveDate;
use tracing::info;

use crate::catalog::{CatalogProvider, StandardsCatalog};
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::policy::{self, Operation};
use crate::selection;
use crate::types::{Audit, AuditItem, ComplianceState, User};

/// A freshly created audit together with its checklist.
///
/// The two are produced and persisted as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAudit {
    /// The audit record.
    pub audit: Audit,
    /// One item per selected standard, in checklist order.
    pub items: Vec<AuditItem>,
}

/// Create an audit of `area` on `date` by `actor`.
///
/// Process codes come from `provider`; an area with no mapped processes
/// yields an audit with an empty checklist. Each selected standard becomes
/// an item with compliance `SI` and empty observation and evidence.
///
/// # Errors
///
/// [`crate::AuditError::Permission`] unless `actor` is an Auditor. Nothing
/// is created in that case.
pub fn create_audit(
    actor: &User,
    date: NaiveDate,
    area: &str,
    provider: &CatalogProvider,
    standards: &StandardsCatalog,
    ids: &mut dyn IdGenerator,
) -> Result<NewAudit> {
    policy::authorize(actor, Operation::CreateAudit)?;

    let processes = provider.processes_for(area).to_vec();
    let audit = Audit {
        id: ids.next_id(),
        date,
        area: area.to_owned(),
        processes,
        auditor: actor.name.clone(),
    };

    let items: Vec<AuditItem> = selection::select(standards.all(), area, &audit.processes)
        .into_iter()
        .map(|pick| AuditItem {
            id: ids.next_id(),
            audit_id: audit.id.clone(),
            process: pick.process.to_owned(),
            standard_id: pick.standard.id.clone(),
            code: pick.standard.code.clone(),
            name: pick.standard.name.clone(),
            criticality: pick.standard.criticality,
            compliance: ComplianceState::Yes,
            observation: String::new(),
            evidence_url: String::new(),
        })
        .collect();

    info!(
        audit_id = %audit.id,
        area = %audit.area,
        processes = audit.processes.len(),
        items = items.len(),
        auditor = %audit.auditor,
        "audit created"
    );

    Ok(NewAudit { audit, items })
}
