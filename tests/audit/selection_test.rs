//! Checklist selection properties.

use auditora::catalog::CatalogProvider;
use auditora::selection::{self, MAX_PER_PROCESS};
use auditora::types::{Criticality, Standard};

fn standard(code: &str, process: &str, criticality: Criticality, priority: u32) -> Standard {
    Standard {
        id: format!("std-{code}"),
        area: "Operaciones".to_owned(),
        process: process.to_owned(),
        criticality,
        priority,
        code: code.to_owned(),
        name: code.to_owned(),
        file_url: None,
    }
}

fn codes(picks: &[selection::Pick<'_>]) -> Vec<String> {
    picks.iter().map(|p| p.standard.code.clone()).collect()
}

#[test]
fn example_quota_picks_most_urgent_per_tier() {
    let catalog = vec![
        standard("A1", "S", Criticality::A, 1),
        standard("A2", "S", Criticality::A, 2),
        standard("A3", "S", Criticality::A, 3),
        standard("A4", "S", Criticality::A, 4),
        standard("B1", "S", Criticality::B, 1),
        standard("B2", "S", Criticality::B, 2),
        standard("B3", "S", Criticality::B, 3),
        standard("C1", "S", Criticality::C, 1),
        standard("C2", "S", Criticality::C, 2),
    ];
    let processes = vec!["S".to_owned()];
    let picks = selection::select(&catalog, "Operaciones", &processes);
    assert_eq!(codes(&picks), ["A1", "A2", "A3", "B1", "B2", "C1"]);
}

#[test]
fn shortfall_yields_shorter_checklist() {
    let catalog = vec![
        standard("B9", "S", Criticality::B, 9),
        standard("A5", "S", Criticality::A, 5),
    ];
    let processes = vec!["S".to_owned()];
    let picks = selection::select(&catalog, "Operaciones", &processes);
    assert_eq!(codes(&picks), ["A5", "B9"]);
}

#[test]
fn processes_are_emitted_in_input_order() {
    let catalog = vec![
        standard("Q-A1", "Q", Criticality::A, 1),
        standard("S-A1", "S", Criticality::A, 1),
    ];
    let processes = vec!["S".to_owned(), "Q".to_owned()];
    let picks = selection::select(&catalog, "Operaciones", &processes);
    assert_eq!(codes(&picks), ["S-A1", "Q-A1"]);
    assert_eq!(picks[0].process, "S");
    assert_eq!(picks[1].process, "Q");
}

#[test]
fn builtin_catalog_respects_cap_and_tier_order() {
    let provider = CatalogProvider::builtin().expect("catalog");
    for area in &provider.areas {
        let processes = provider.processes_for(area);
        let picks = selection::select(&provider.initial_standards, area, processes);
        for process in processes {
            let tiers: Vec<Criticality> = picks
                .iter()
                .filter(|p| p.process == process.as_str())
                .map(|p| p.standard.criticality)
                .collect();
            assert!(tiers.len() <= MAX_PER_PROCESS, "{area}/{process} over cap");
            assert!(tiers.windows(2).all(|w| w[0] <= w[1]), "{area}/{process} unordered");
        }
    }
}

#[test]
fn selection_is_deterministic() {
    let provider = CatalogProvider::builtin().expect("catalog");
    let processes = provider.processes_for("Operaciones");
    let first = codes(&selection::select(
        &provider.initial_standards,
        "Operaciones",
        processes,
    ));
    let second = codes(&selection::select(
        &provider.initial_standards,
        "Operaciones",
        processes,
    ));
    assert_eq!(first, second);
}
