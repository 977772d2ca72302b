//! Remediation plan lifecycle.
//!
//! A plan is opened lazily for an audit item and then moved through six
//! states by role-gated operations:
//!
//! | Operation                 | Allowed role         | Effect                                   |
//! |---------------------------|----------------------|------------------------------------------|
//! | [`get_or_create`]         | any                  | opens the item's plan once               |
//! | [`assign`]                | Responsable de Área  | responsible area/action, start/close date |
//! | [`set_state`]             | Responsable de Área  | any of the six states                    |
//! | [`reprogram`]             | Auditor              | close date and rescheduled-until         |
//! | [`verify`]                | Auditor              | `EJECUTADO`, verifier and date           |
//! | [`annotate`]              | any                  | description, evidence, closure comment   |
//!
//! Role checks run before the plan is looked up or touched; a denied call
//! leaves every plan exactly as it was.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{AuditError, Result};
use crate::ids::IdGenerator;
use crate::policy::{self, Operation};
use crate::types::{AuditItem, PlanState, RemediationPlan, User};

/// A field write performed by [`assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Area accountable for the plan.
    ResponsibleArea(String),
    /// Person accountable for the action.
    ResponsibleAction(String),
    /// Planned start; `None` clears it.
    StartDate(Option<NaiveDate>),
    /// Planned close; `None` clears it.
    CloseDate(Option<NaiveDate>),
}

impl Assignment {
    fn field(&self) -> &'static str {
        match self {
            Self::ResponsibleArea(_) => "responsible_area",
            Self::ResponsibleAction(_) => "responsible_action",
            Self::StartDate(_) => "start_date",
            Self::CloseDate(_) => "close_date",
        }
    }
}

/// A free-text write performed by [`annotate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Plan description.
    Description(String),
    /// Link to closure evidence.
    EvidenceUrl(String),
    /// Comment recorded on closure.
    ClosureComment(String),
}

/// Result of [`get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opened<'a> {
    /// The item's plan.
    pub plan: &'a RemediationPlan,
    /// Whether this call created it.
    pub created: bool,
}

fn find_plan<'a>(
    plans: &'a mut [RemediationPlan],
    plan_id: &str,
) -> Result<&'a mut RemediationPlan> {
    plans
        .iter_mut()
        .find(|p| p.id == plan_id)
        .ok_or_else(|| AuditError::not_found("plan", plan_id))
}

/// Return the plan of `item_id`, creating it on first request.
///
/// A new plan starts in `NO_PROGRAMADO`, is titled after the item code,
/// takes its description from the item observation and its responsible area
/// from the actor. An existing plan is returned untouched.
///
/// # Errors
///
/// [`AuditError::NotFound`] when `item_id` is not a known item.
pub fn get_or_create<'a>(
    plans: &'a mut Vec<RemediationPlan>,
    items: &[AuditItem],
    actor: &User,
    item_id: &str,
    ids: &mut dyn IdGenerator,
) -> Result<Opened<'a>> {
    policy::authorize(actor, Operation::OpenPlan)?;
    let item = items
        .iter()
        .find(|i| i.id == item_id)
        .ok_or_else(|| AuditError::not_found("item", item_id))?;

    if let Some(idx) = plans.iter().position(|p| p.item_id == item_id) {
        return Ok(Opened {
            plan: &plans[idx],
            created: false,
        });
    }

    let plan = RemediationPlan {
        id: ids.next_id(),
        item_id: item.id.clone(),
        title: format!("Plan para {}", item.code),
        description: item.observation.clone(),
        responsible_area: actor.area.clone(),
        responsible_action: String::new(),
        start_date: None,
        close_date: None,
        state: PlanState::NoProgramado,
        rescheduled_until: None,
        verified_by: None,
        verification_date: None,
        closure_comment: String::new(),
        evidence_url: String::new(),
    };
    info!(plan_id = %plan.id, item_id, code = %item.code, "remediation plan opened");
    plans.push(plan);
    let last = plans.len().saturating_sub(1);
    Ok(Opened {
        plan: &plans[last],
        created: true,
    })
}

/// Assign a responsible or a date. State is not changed.
///
/// Responsible names are stored trimmed.
///
/// # Errors
///
/// [`AuditError::Permission`] unless `actor` is Responsable de Área;
/// [`AuditError::NotFound`] for an unknown plan.
pub fn assign<'a>(
    plans: &'a mut [RemediationPlan],
    actor: &User,
    plan_id: &str,
    assignment: Assignment,
) -> Result<&'a RemediationPlan> {
    policy::authorize(actor, Operation::AssignPlan)?;
    let plan = find_plan(plans, plan_id)?;
    let field = assignment.field();
    match assignment {
        Assignment::ResponsibleArea(v) => plan.responsible_area = v.trim().to_owned(),
        Assignment::ResponsibleAction(v) => plan.responsible_action = v.trim().to_owned(),
        Assignment::StartDate(d) => plan.start_date = d,
        Assignment::CloseDate(d) => plan.close_date = d,
    }
    info!(plan_id, field, "plan assignment updated");
    Ok(plan)
}

/// Move a plan to `new_state`. Every transition is permitted.
///
/// # Errors
///
/// [`AuditError::Permission`] unless `actor` is Responsable de Área;
/// [`AuditError::NotFound`] for an unknown plan.
pub fn set_state<'a>(
    plans: &'a mut [RemediationPlan],
    actor: &User,
    plan_id: &str,
    new_state: PlanState,
) -> Result<&'a RemediationPlan> {
    policy::authorize(actor, Operation::SetPlanState)?;
    let plan = find_plan(plans, plan_id)?;
    let from = plan.state;
    plan.state = new_state;
    info!(plan_id, from = %from, to = %new_state, "plan state changed");
    Ok(plan)
}

/// Grant a new close date; recorded as both close date and rescheduled-until.
///
/// # Errors
///
/// [`AuditError::Permission`] unless `actor` is an Auditor;
/// [`AuditError::NotFound`] for an unknown plan.
pub fn reprogram<'a>(
    plans: &'a mut [RemediationPlan],
    actor: &User,
    plan_id: &str,
    new_close_date: NaiveDate,
) -> Result<&'a RemediationPlan> {
    policy::authorize(actor, Operation::ReprogramPlan)?;
    let plan = find_plan(plans, plan_id)?;
    plan.rescheduled_until = Some(new_close_date);
    plan.close_date = Some(new_close_date);
    info!(plan_id, until = %new_close_date, "plan reprogrammed");
    Ok(plan)
}

/// Verify and close a plan from any state.
///
/// # Errors
///
/// [`AuditError::Permission`] unless `actor` is an Auditor;
/// [`AuditError::NotFound`] for an unknown plan.
pub fn verify<'a>(
    plans: &'a mut [RemediationPlan],
    actor: &User,
    plan_id: &str,
    today: NaiveDate,
) -> Result<&'a RemediationPlan> {
    policy::authorize(actor, Operation::VerifyPlan)?;
    let plan = find_plan(plans, plan_id)?;
    let from = plan.state;
    plan.state = PlanState::Ejecutado;
    plan.verified_by = Some(actor.name.clone());
    plan.verification_date = Some(today);
    info!(plan_id, from = %from, verified_by = %actor.name, "plan verified");
    Ok(plan)
}

/// Overwrite a free-text field.
///
/// # Errors
///
/// [`AuditError::NotFound`] for an unknown plan.
pub fn annotate<'a>(
    plans: &'a mut [RemediationPlan],
    actor: &User,
    plan_id: &str,
    annotation: Annotation,
) -> Result<&'a RemediationPlan> {
    policy::authorize(actor, Operation::AnnotatePlan)?;
    let plan = find_plan(plans, plan_id)?;
    match annotation {
        Annotation::Description(v) => plan.description = v,
        Annotation::EvidenceUrl(v) => plan.evidence_url = v,
        Annotation::ClosureComment(v) => plan.closure_comment = v,
    }
    info!(plan_id, "plan annotated");
    Ok(plan)
}
