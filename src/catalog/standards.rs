//! In-memory standards collection with administrative growth.

use tracing::info;

use crate::catalog::CatalogProvider;
use crate::error::{AuditError, Result};
use crate::ids::IdGenerator;
use crate::policy::{self, Operation};
use crate::types::{Criticality, Standard, User};

/// Append-only collection of [`Standard`] records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardsCatalog {
    standards: Vec<Standard>,
}

/// Input for [`StandardsCatalog::add_standard`].
#[derive(Debug, Clone)]
pub struct NewStandard {
    /// Target area.
    pub area: String,
    /// Target process code.
    pub process: String,
    /// Severity tier.
    pub criticality: Criticality,
    /// Priority; `None` means 1.
    pub priority: Option<i64>,
    /// Short code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Optional reference document link.
    pub file_url: Option<String>,
}

impl StandardsCatalog {
    /// Wrap an existing snapshot.
    pub fn new(standards: Vec<Standard>) -> Self {
        Self { standards }
    }

    /// All standards in insertion order.
    pub fn all(&self) -> &[Standard] {
        &self.standards
    }

    /// Number of standards.
    pub fn len(&self) -> usize {
        self.standards.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }

    /// Look up a standard by id.
    pub fn get(&self, id: &str) -> Option<&Standard> {
        self.standards.iter().find(|s| s.id == id)
    }

    /// Standards of one (area, process) ordered by criticality, then priority.
    ///
    /// Equal keys keep insertion order.
    pub fn list(&self, area: &str, process: &str) -> Vec<&Standard> {
        let mut out: Vec<&Standard> = self
            .standards
            .iter()
            .filter(|s| s.area == area && s.process == process)
            .collect();
        out.sort_by_key(|s| (s.criticality, s.priority));
        out
    }

    /// Append a standard after checking role and input.
    ///
    /// Code and name must be non-empty after trimming, priority must be a
    /// positive integer (omitted means 1), and the area and process must
    /// exist in `provider`.
    ///
    /// # Errors
    ///
    /// [`AuditError::Permission`] unless `actor` is Excelencia Operacional;
    /// [`AuditError::Validation`] on bad input. Nothing is added on error.
    pub fn add_standard(
        &mut self,
        actor: &User,
        input: NewStandard,
        provider: &CatalogProvider,
        ids: &mut dyn IdGenerator,
    ) -> Result<&Standard> {
        policy::authorize(actor, Operation::AddStandard)?;

        let code = input.code.trim();
        let name = input.name.trim();
        if code.is_empty() || name.is_empty() {
            return Err(AuditError::Validation(
                "standard code and name are required".to_owned(),
            ));
        }
        let raw_priority = input.priority.unwrap_or(1);
        let priority = u32::try_from(raw_priority)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| {
                AuditError::Validation(format!(
                    "priority must be a positive integer, got {raw_priority}"
                ))
            })?;
        if !provider.has_area(&input.area) {
            return Err(AuditError::Validation(format!(
                "unknown area: {}",
                input.area
            )));
        }
        if !provider.has_process(&input.process) {
            return Err(AuditError::Validation(format!(
                "unknown process: {}",
                input.process
            )));
        }

        let file_url = input
            .file_url
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty());

        let standard = Standard {
            id: ids.next_id(),
            area: input.area,
            process: input.process,
            criticality: input.criticality,
            priority,
            code: code.to_owned(),
            name: name.to_owned(),
            file_url,
        };
        info!(
            standard_id = %standard.id,
            code = %standard.code,
            area = %standard.area,
            process = %standard.process,
            "standard added"
        );
        self.standards.push(standard);
        let last = self.standards.len().saturating_sub(1);
        Ok(&self.standards[last])
    }
}
