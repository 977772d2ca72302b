//! Remediation plan lifecycle and its role gates.

use auditora::ids::SequentialIds;
use auditora::lifecycle::{self, Annotation, Assignment};
use auditora::types::{
    AuditItem, ComplianceState, Criticality, PlanState, RemediationPlan, Role, User,
};
use chrono::NaiveDate;

fn user(role: Role) -> User {
    User {
        id: format!("u-{role:?}"),
        name: format!("{role:?}"),
        email: "someone@planta.pe".to_owned(),
        role,
        area: "Logística".to_owned(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn items() -> Vec<AuditItem> {
    vec![AuditItem {
        id: "item-1".to_owned(),
        audit_id: "audit-1".to_owned(),
        process: "S".to_owned(),
        standard_id: "std-log-s-a1".to_owned(),
        code: "LOG-S-A1".to_owned(),
        name: "Pasillos despejados".to_owned(),
        criticality: Criticality::A,
        compliance: ComplianceState::No,
        observation: "pallets en pasillo 4".to_owned(),
        evidence_url: String::new(),
    }]
}

/// One plan opened by an auditor; returns plans and the plan id.
fn opened() -> (Vec<RemediationPlan>, String) {
    let mut plans = Vec::new();
    let mut ids = SequentialIds::new("plan");
    let id = lifecycle::get_or_create(&mut plans, &items(), &user(Role::Auditor), "item-1", &mut ids)
        .expect("open")
        .plan
        .id
        .clone();
    (plans, id)
}

#[test]
fn get_or_create_is_idempotent() {
    let mut plans = Vec::new();
    let items = items();
    let mut ids = SequentialIds::new("plan");
    let actor = user(Role::AreaManager);
    let first = lifecycle::get_or_create(&mut plans, &items, &actor, "item-1", &mut ids)
        .expect("open")
        .plan
        .id
        .clone();
    let again = lifecycle::get_or_create(&mut plans, &items, &actor, "item-1", &mut ids)
        .expect("open");
    assert!(!again.created);
    assert_eq!(again.plan.id, first);
    assert_eq!(plans.len(), 1);
}

#[test]
fn unknown_item_is_not_found() {
    let mut plans = Vec::new();
    let mut ids = SequentialIds::new("plan");
    let err = lifecycle::get_or_create(&mut plans, &items(), &user(Role::Auditor), "x", &mut ids)
        .expect_err("unknown");
    assert!(err.is_not_found());
    assert!(plans.is_empty());
}

#[test]
fn reprogram_sets_close_and_rescheduled_dates() {
    let (mut plans, id) = opened();
    let until = date(2025, 1, 10);
    let plan = lifecycle::reprogram(&mut plans, &user(Role::Auditor), &id, until).expect("ok");
    assert_eq!(plan.close_date, Some(until));
    assert_eq!(plan.rescheduled_until, Some(until));
}

#[test]
fn reprogram_by_area_manager_is_denied_and_unchanged() {
    let (mut plans, id) = opened();
    let before = plans.clone();
    let err = lifecycle::reprogram(&mut plans, &user(Role::AreaManager), &id, date(2025, 1, 10))
        .expect_err("denied");
    assert!(err.is_permission());
    assert_eq!(plans, before);
}

#[test]
fn disallowed_roles_never_mutate() {
    let (mut plans, id) = opened();
    let before = plans.clone();
    let today = date(2025, 5, 5);
    for role in [Role::Auditor, Role::OperationalExcellence] {
        let actor = user(role);
        assert!(lifecycle::assign(
            &mut plans,
            &actor,
            &id,
            Assignment::ResponsibleAction("Luis".to_owned())
        )
        .expect_err("assign denied")
        .is_permission());
        assert!(lifecycle::set_state(&mut plans, &actor, &id, PlanState::EnProceso)
            .expect_err("state denied")
            .is_permission());
    }
    for role in [Role::AreaManager, Role::OperationalExcellence] {
        let actor = user(role);
        assert!(lifecycle::verify(&mut plans, &actor, &id, today)
            .expect_err("verify denied")
            .is_permission());
        assert!(lifecycle::reprogram(&mut plans, &actor, &id, today)
            .expect_err("reprogram denied")
            .is_permission());
    }
    assert_eq!(plans, before);
}

#[test]
fn verify_closes_from_every_state() {
    let auditor = user(Role::Auditor);
    let manager = user(Role::AreaManager);
    for state in PlanState::ALL {
        let (mut plans, id) = opened();
        lifecycle::set_state(&mut plans, &manager, &id, state).expect("state");
        let plan = lifecycle::verify(&mut plans, &auditor, &id, date(2025, 6, 1)).expect("verify");
        assert_eq!(plan.state, PlanState::Ejecutado);
        assert_eq!(plan.verified_by.as_deref(), Some(auditor.name.as_str()));
        assert_eq!(plan.verification_date, Some(date(2025, 6, 1)));
    }
}

#[test]
fn assign_dates_can_be_cleared() {
    let (mut plans, id) = opened();
    let manager = user(Role::AreaManager);
    lifecycle::assign(&mut plans, &manager, &id, Assignment::StartDate(Some(date(2025, 2, 1))))
        .expect("assign");
    let plan = lifecycle::assign(&mut plans, &manager, &id, Assignment::StartDate(None))
        .expect("assign");
    assert_eq!(plan.start_date, None);
}

#[test]
fn annotations_overwrite_text_fields() {
    let (mut plans, id) = opened();
    let actor = user(Role::OperationalExcellence);
    lifecycle::annotate(&mut plans, &actor, &id, Annotation::Description("mover pallets".to_owned()))
        .expect("note");
    let plan = lifecycle::annotate(
        &mut plans,
        &actor,
        &id,
        Annotation::EvidenceUrl("https://fotos/2.jpg".to_owned()),
    )
    .expect("note");
    assert_eq!(plan.description, "mover pallets");
    assert_eq!(plan.evidence_url, "https://fotos/2.jpg");
}

#[test]
fn unknown_plan_is_not_found_for_allowed_role() {
    let (mut plans, _) = opened();
    let err = lifecycle::set_state(&mut plans, &user(Role::AreaManager), "nope", PlanState::Eliminado)
        .expect_err("unknown");
    assert!(err.is_not_found());
}
