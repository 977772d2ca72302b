//! Dashboard counters and plan filtering.

use auditora::summary::{self, PlanFilter, ALL};
use auditora::types::{
    Audit, AuditItem, ComplianceState, Criticality, PlanState, RemediationPlan,
};
use chrono::NaiveDate;

fn audit(id: &str) -> Audit {
    Audit {
        id: id.to_owned(),
        date: NaiveDate::from_ymd_opt(2025, 4, 1).expect("date"),
        area: "Operaciones".to_owned(),
        processes: vec!["S".to_owned()],
        auditor: "Ana".to_owned(),
    }
}

fn item(id: &str, compliance: ComplianceState) -> AuditItem {
    AuditItem {
        id: id.to_owned(),
        audit_id: "a1".to_owned(),
        process: "S".to_owned(),
        standard_id: format!("std-{id}"),
        code: format!("OP-S-{id}"),
        name: id.to_owned(),
        criticality: Criticality::B,
        compliance,
        observation: String::new(),
        evidence_url: String::new(),
    }
}

fn plan(id: &str, item_id: &str, state: PlanState, responsible: &str) -> RemediationPlan {
    RemediationPlan {
        id: id.to_owned(),
        item_id: item_id.to_owned(),
        title: format!("Plan para {item_id}"),
        description: String::new(),
        responsible_area: "Operaciones".to_owned(),
        responsible_action: responsible.to_owned(),
        start_date: None,
        close_date: None,
        state,
        rescheduled_until: None,
        verified_by: None,
        verification_date: None,
        closure_comment: String::new(),
        evidence_url: String::new(),
    }
}

#[test]
fn dashboard_counts() {
    let audits = vec![audit("a1"), audit("a2"), audit("a3")];
    let mut items: Vec<AuditItem> = (0..8)
        .map(|n| item(&format!("ok{n}"), ComplianceState::Yes))
        .collect();
    items.push(item("bad1", ComplianceState::No));
    items.push(item("bad2", ComplianceState::No));
    let plans = vec![
        plan("p1", "bad1", PlanState::Ejecutado, ""),
        plan("p2", "bad2", PlanState::Eliminado, ""),
        plan("p3", "ok1", PlanState::EnProceso, ""),
        plan("p4", "ok2", PlanState::NoProgramado, ""),
    ];

    let s = summary::summary(&audits, &items, &plans);
    assert_eq!(s.audit_count, 3);
    assert_eq!(s.open_observation_count, 2);
    assert_eq!(s.open_plan_count, 2);
    assert_eq!(s.closed_plan_count, 1);
}

#[test]
fn empty_collections_count_zero() {
    let s = summary::summary(&[], &[], &[]);
    assert_eq!(s, summary::Summary::default());
}

#[test]
fn filters_and_views() {
    let items = vec![item("x1", ComplianceState::No)];
    let plans = vec![
        plan("p1", "x1", PlanState::Retrasado, "Luis"),
        plan("p2", "gone", PlanState::Retrasado, "Marta"),
        plan("p3", "x1", PlanState::EnProceso, "Luis"),
    ];

    let all = PlanFilter::from_choices(Some(ALL), Some(ALL)).expect("filter");
    assert_eq!(summary::filter_plans(&plans, &all).len(), 3);

    let late = PlanFilter::from_choices(Some("RETRASADO"), None).expect("filter");
    let late_plans = summary::filter_plans(&plans, &late);
    let views = summary::plan_views(&late_plans, &items);
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].item_code, Some("OP-S-x1"));
    assert_eq!(views[0].criticality, Some(Criticality::B));
    assert_eq!(views[1].item_code, None);

    let luis = PlanFilter::from_choices(None, Some("Luis")).expect("filter");
    let ids: Vec<&str> = summary::filter_plans(&plans, &luis)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, ["p1", "p3"]);
}

#[test]
fn state_choices_follow_display_order() {
    assert_eq!(
        summary::state_options(),
        [
            ALL,
            "EJECUTADO",
            "RETRASADO",
            "EN_PROCESO",
            "NO_INICIADO",
            "NO_PROGRAMADO",
            "ELIMINADO"
        ]
    );
}
