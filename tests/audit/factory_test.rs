//! Audit creation through the factory.

use auditora::audit::{create_audit, items_for_audit, recent_first};
use auditora::catalog::{CatalogProvider, StandardsCatalog};
use auditora::ids::SequentialIds;
use auditora::types::{ComplianceState, Role, User};
use chrono::NaiveDate;

fn user(role: Role) -> User {
    User {
        id: "u1".to_owned(),
        name: "Ana Paz".to_owned(),
        email: "ana@planta.pe".to_owned(),
        role,
        area: "Operaciones".to_owned(),
    }
}

fn fixtures() -> (CatalogProvider, StandardsCatalog) {
    let provider = CatalogProvider::builtin().expect("catalog");
    let standards = StandardsCatalog::new(provider.initial_standards.clone());
    (provider, standards)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date")
}

#[test]
fn non_auditor_cannot_create() {
    let (provider, standards) = fixtures();
    let mut ids = SequentialIds::new("x");
    for role in [Role::AreaManager, Role::OperationalExcellence] {
        let err = create_audit(&user(role), date(), "Operaciones", &provider, &standards, &mut ids)
            .expect_err("denied");
        assert!(err.is_permission());
    }
}

#[test]
fn items_carry_standard_snapshot() {
    let (provider, standards) = fixtures();
    let mut ids = SequentialIds::new("x");
    let created = create_audit(
        &user(Role::Auditor),
        date(),
        "Mantenimiento",
        &provider,
        &standards,
        &mut ids,
    )
    .expect("create");

    assert_eq!(created.audit.date, date());
    assert_eq!(created.audit.processes, ["S", "Q"]);
    for item in &created.items {
        let standard = standards.get(&item.standard_id).expect("standard exists");
        assert_eq!(item.code, standard.code);
        assert_eq!(item.name, standard.name);
        assert_eq!(item.criticality, standard.criticality);
        assert_eq!(item.compliance, ComplianceState::Yes);
        assert!(item.observation.is_empty());
        assert!(item.evidence_url.is_empty());
    }
}

#[test]
fn listing_helpers() {
    let (provider, standards) = fixtures();
    let mut ids = SequentialIds::new("x");
    let auditor = user(Role::Auditor);
    let first = create_audit(&auditor, date(), "Operaciones", &provider, &standards, &mut ids)
        .expect("create");
    let second = create_audit(&auditor, date(), "Logística", &provider, &standards, &mut ids)
        .expect("create");

    let audits = vec![first.audit.clone(), second.audit.clone()];
    let recent: Vec<&str> = recent_first(&audits).iter().map(|a| a.id.as_str()).collect();
    assert_eq!(recent, [second.audit.id.as_str(), first.audit.id.as_str()]);

    let mut items = first.items.clone();
    items.extend(second.items.clone());
    assert_eq!(items_for_audit(&items, &second.audit.id).len(), second.items.len());
}
