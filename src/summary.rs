//! Read-only dashboard metrics and plan filtering.

use serde::Serialize;

use crate::error::Result;
use crate::types::{Audit, AuditItem, ComplianceState, Criticality, PlanState, RemediationPlan};

/// Filter value meaning "no filter on this dimension".
pub const ALL: &str = "(Todos)";

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of audits.
    pub audit_count: usize,
    /// Items recorded as non-compliant.
    pub open_observation_count: usize,
    /// Plans neither executed nor deleted.
    pub open_plan_count: usize,
    /// Plans executed.
    pub closed_plan_count: usize,
}

/// Compute dashboard counters over the current collections.
pub fn summary(audits: &[Audit], items: &[AuditItem], plans: &[RemediationPlan]) -> Summary {
    Summary {
        audit_count: audits.len(),
        open_observation_count: items
            .iter()
            .filter(|i| i.compliance == ComplianceState::No)
            .count(),
        open_plan_count: plans.iter().filter(|p| p.state.is_open()).count(),
        closed_plan_count: plans
            .iter()
            .filter(|p| p.state == PlanState::Ejecutado)
            .count(),
    }
}

/// Equality filters over plans. `None` on a dimension matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanFilter {
    /// Required state.
    pub state: Option<PlanState>,
    /// Required responsible action.
    pub responsible: Option<String>,
}

impl PlanFilter {
    /// Build a filter from raw choice strings.
    ///
    /// A missing value, an empty string or [`ALL`] disables that dimension.
    ///
    /// # Errors
    ///
    /// [`crate::AuditError::Validation`] when the state is not one of the six
    /// plan states.
    pub fn from_choices(state: Option<&str>, responsible: Option<&str>) -> Result<Self> {
        let state = match active_choice(state) {
            Some(raw) => Some(raw.parse::<PlanState>()?),
            None => None,
        };
        Ok(Self {
            state,
            responsible: active_choice(responsible).map(str::to_owned),
        })
    }

    /// Whether `plan` passes every active dimension.
    pub fn matches(&self, plan: &RemediationPlan) -> bool {
        self.state.map_or(true, |s| plan.state == s)
            && self
                .responsible
                .as_deref()
                .map_or(true, |r| plan.responsible_action == r)
    }
}

/// The raw value, unless it is blank or [`ALL`].
///
/// Active values are not trimmed: they must equal a stored value exactly.
fn active_choice(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != ALL
    })
}

/// Plans passing `filter`, in stored order.
pub fn filter_plans<'a>(plans: &'a [RemediationPlan], filter: &PlanFilter) -> Vec<&'a RemediationPlan> {
    plans.iter().filter(|p| filter.matches(p)).collect()
}

/// Distinct non-empty responsible actions, in first-seen order.
///
/// Recomputed from the plans on every call.
pub fn responsible_options(plans: &[RemediationPlan]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for plan in plans {
        let name = plan.responsible_action.as_str();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// State filter choices: [`ALL`] followed by every state in display order.
pub fn state_options() -> Vec<&'static str> {
    std::iter::once(ALL)
        .chain(PlanState::ALL.iter().map(PlanState::as_str))
        .collect()
}

/// A plan joined with the item it remediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanView<'a> {
    /// The plan.
    pub plan: &'a RemediationPlan,
    /// Code of the remediated item, if the item is still present.
    pub item_code: Option<&'a str>,
    /// Criticality of the remediated item.
    pub criticality: Option<Criticality>,
}

/// Join plans with their items for listing.
pub fn plan_views<'a>(plans: &[&'a RemediationPlan], items: &'a [AuditItem]) -> Vec<PlanView<'a>> {
    plans
        .iter()
        .map(|plan| {
            let item = items.iter().find(|i| i.id == plan.item_id);
            PlanView {
                plan,
                item_code: item.map(|i| i.code.as_str()),
                criticality: item.map(|i| i.criticality),
            }
        })
        .collect()
}
