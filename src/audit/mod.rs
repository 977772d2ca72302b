//! Audits and their checklist items.
//!
//! - [`factory`] creates an audit with its selected checklist (Auditor only).
//! - [`recorder`] records compliance, observations and evidence on items.

pub mod factory;
pub mod recorder;

use crate::types::{Audit, AuditItem};

pub use self::factory::{create_audit, NewAudit};

/// Audits most recent first (reverse creation order).
pub fn recent_first(audits: &[Audit]) -> Vec<&Audit> {
    audits.iter().rev().collect()
}

/// Items of one audit, in checklist order.
pub fn items_for_audit<'a>(items: &'a [AuditItem], audit_id: &str) -> Vec<&'a AuditItem> {
    items.iter().filter(|i| i.audit_id == audit_id).collect()
}
