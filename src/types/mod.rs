//! Core domain types: roles, enumerations and the five persisted entities.
//!
//! Enum values serialize as their domain labels (`"Responsable de Área"`,
//! `"SI"`, `"NO_PROGRAMADO"`) so snapshots stay readable and stable.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AuditError;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Self-declared role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Creates audits, reprograms and verifies plans.
    #[serde(rename = "Auditor")]
    Auditor,
    /// Owns remediation: assigns responsibles and dates, moves plan state.
    #[serde(rename = "Responsable de Área")]
    AreaManager,
    /// Maintains the standards catalog.
    #[serde(rename = "Excelencia Operacional")]
    OperationalExcellence,
}

impl Role {
    /// All roles in catalog order.
    pub const ALL: [Role; 3] = [
        Role::Auditor,
        Role::AreaManager,
        Role::OperationalExcellence,
    ];

    /// Domain label, as shown to users and stored in snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auditor => "Auditor",
            Self::AreaManager => "Responsable de Área",
            Self::OperationalExcellence => "Excelencia Operacional",
        }
    }

    /// Parse a role from its label or a short slug.
    ///
    /// Accepts the exact label case-insensitively, plus `auditor`,
    /// `responsable`, `area-manager`, `excelencia` and
    /// `operational-excellence`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Validation`] for anything else.
    pub fn parse(s: &str) -> Result<Self, AuditError> {
        let needle = s.trim().to_lowercase();
        match needle.as_str() {
            "auditor" => Ok(Self::Auditor),
            "responsable de área" | "responsable de area" | "responsable" | "area-manager" => {
                Ok(Self::AreaManager)
            }
            "excelencia operacional" | "excelencia" | "operational-excellence" => {
                Ok(Self::OperationalExcellence)
            }
            _ => Err(AuditError::Validation(format!("unknown role: {s}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Severity tier of a standard. `A` is the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criticality {
    /// Most severe.
    A,
    /// Intermediate.
    B,
    /// Least severe.
    C,
}

impl Criticality {
    /// Single-letter label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criticality {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            _ => Err(AuditError::Validation(format!("unknown criticality: {s}"))),
        }
    }
}

/// Outcome recorded for one checklist item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceState {
    /// Compliant.
    #[default]
    #[serde(rename = "SI")]
    Yes,
    /// Non-compliant: an open observation.
    #[serde(rename = "NO")]
    No,
    /// Not applicable.
    #[serde(rename = "NA")]
    NotApplicable,
}

impl ComplianceState {
    /// Domain label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "SI",
            Self::No => "NO",
            Self::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for ComplianceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceState {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SI" | "SÍ" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            "NA" | "N/A" => Ok(Self::NotApplicable),
            _ => Err(AuditError::Validation(format!(
                "unknown compliance state: {s}"
            ))),
        }
    }
}

/// Lifecycle state of a remediation plan. No state is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanState {
    /// Created, not yet scheduled.
    #[default]
    NoProgramado,
    /// Scheduled, not started.
    NoIniciado,
    /// In progress.
    EnProceso,
    /// Past its close date.
    Retrasado,
    /// Executed (closed).
    Ejecutado,
    /// Discarded. Still stored.
    Eliminado,
}

impl PlanState {
    /// All states in display order.
    pub const ALL: [PlanState; 6] = [
        PlanState::Ejecutado,
        PlanState::Retrasado,
        PlanState::EnProceso,
        PlanState::NoIniciado,
        PlanState::NoProgramado,
        PlanState::Eliminado,
    ];

    /// Domain label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoProgramado => "NO_PROGRAMADO",
            Self::NoIniciado => "NO_INICIADO",
            Self::EnProceso => "EN_PROCESO",
            Self::Retrasado => "RETRASADO",
            Self::Ejecutado => "EJECUTADO",
            Self::Eliminado => "ELIMINADO",
        }
    }

    /// Whether the plan still counts as open work.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Ejecutado | Self::Eliminado)
    }
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanState {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == wanted)
            .ok_or_else(|| AuditError::Validation(format!("unknown plan state: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A registered user. Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id.
    pub id: String,
    /// Display name; also recorded as auditor and verifier.
    pub name: String,
    /// Contact email; used to select the acting user.
    pub email: String,
    /// Declared role.
    pub role: Role,
    /// Area the user belongs to.
    pub area: String,
}

/// A catalog standard that can be selected into a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    /// Unique id.
    pub id: String,
    /// Area the standard applies to.
    pub area: String,
    /// Process code within the area.
    pub process: String,
    /// Severity tier.
    pub criticality: Criticality,
    /// Positive priority; lower is more urgent.
    pub priority: u32,
    /// Short code, e.g. `"OP-S-A1"`.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Optional link to the reference document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// An audit of one area on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    /// Unique id.
    pub id: String,
    /// Audit date.
    pub date: NaiveDate,
    /// Audited area.
    pub area: String,
    /// Process codes covered, in catalog order.
    pub processes: Vec<String>,
    /// Name of the auditor who created it.
    pub auditor: String,
}

/// One checklist line of an audit.
///
/// Code, name and criticality are copied from the standard at creation time
/// so later catalog growth never rewrites past audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditItem {
    /// Unique id.
    pub id: String,
    /// Owning audit.
    pub audit_id: String,
    /// Process code this item belongs to.
    pub process: String,
    /// Source standard.
    pub standard_id: String,
    /// Standard code snapshot.
    pub code: String,
    /// Standard name snapshot.
    pub name: String,
    /// Standard criticality snapshot.
    pub criticality: Criticality,
    /// Recorded outcome.
    #[serde(default)]
    pub compliance: ComplianceState,
    /// Free-text finding.
    #[serde(default)]
    pub observation: String,
    /// Link to photo or document evidence.
    #[serde(default)]
    pub evidence_url: String,
}

/// Corrective-action plan for a failed audit item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationPlan {
    /// Unique id.
    pub id: String,
    /// Item this plan remediates. At most one plan per item.
    pub item_id: String,
    /// Title, derived from the item code.
    pub title: String,
    /// Description, seeded from the item observation.
    #[serde(default)]
    pub description: String,
    /// Area accountable for the plan.
    #[serde(default)]
    pub responsible_area: String,
    /// Person accountable for the action.
    #[serde(default)]
    pub responsible_action: String,
    /// Planned start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Planned close.
    #[serde(default)]
    pub close_date: Option<NaiveDate>,
    /// Lifecycle state.
    #[serde(default)]
    pub state: PlanState,
    /// Last date granted by an auditor reprogramming.
    #[serde(default)]
    pub rescheduled_until: Option<NaiveDate>,
    /// Name of the verifying auditor.
    #[serde(default)]
    pub verified_by: Option<String>,
    /// Date of verification.
    #[serde(default)]
    pub verification_date: Option<NaiveDate>,
    /// Comment recorded on closure.
    #[serde(default)]
    pub closure_comment: String,
    /// Link to closure evidence.
    #[serde(default)]
    pub evidence_url: String,
}
