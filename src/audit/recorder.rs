//! Field setters for the mutable part of an audit item.
//!
//! Each setter overwrites one field unconditionally. Repeating the same
//! write leaves the item as it was.

use tracing::info;

use crate::error::{AuditError, Result};
use crate::policy::{self, Operation};
use crate::types::{AuditItem, ComplianceState, User};

fn find_item<'a>(items: &'a mut [AuditItem], item_id: &str) -> Result<&'a mut AuditItem> {
    items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or_else(|| AuditError::not_found("item", item_id))
}

/// Record SI / NO / NA on an item.
///
/// # Errors
///
/// [`AuditError::NotFound`] for an unknown item id.
pub fn set_compliance<'a>(
    items: &'a mut [AuditItem],
    actor: &User,
    item_id: &str,
    value: ComplianceState,
) -> Result<&'a AuditItem> {
    policy::authorize(actor, Operation::RecordCompliance)?;
    let item = find_item(items, item_id)?;
    item.compliance = value;
    info!(item_id, code = %item.code, compliance = %value, "compliance recorded");
    Ok(item)
}

/// Replace an item's observation text.
///
/// # Errors
///
/// [`AuditError::NotFound`] for an unknown item id.
pub fn set_observation<'a>(
    items: &'a mut [AuditItem],
    actor: &User,
    item_id: &str,
    text: &str,
) -> Result<&'a AuditItem> {
    policy::authorize(actor, Operation::RecordCompliance)?;
    let item = find_item(items, item_id)?;
    text.clone_into(&mut item.observation);
    info!(item_id, code = %item.code, "observation recorded");
    Ok(item)
}

/// Replace an item's evidence link.
///
/// # Errors
///
/// [`AuditError::NotFound`] for an unknown item id.
pub fn set_evidence_url<'a>(
    items: &'a mut [AuditItem],
    actor: &User,
    item_id: &str,
    url: &str,
) -> Result<&'a AuditItem> {
    policy::authorize(actor, Operation::RecordCompliance)?;
    let item = find_item(items, item_id)?;
    url.clone_into(&mut item.evidence_url);
    info!(item_id, code = %item.code, "evidence recorded");
    Ok(item)
}
