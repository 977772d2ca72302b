//! Catalog loading and validation.

use auditora::catalog::CatalogProvider;
use auditora::types::{Criticality, Role};

const SMALL: &str = r#"
roles = ["Auditor", "Responsable de Área"]
areas = ["Bodega"]

[area_processes]
"Bodega" = ["S"]

[process_names]
S = "Seguridad"

[[standards]]
id = "b-s-a1"
area = "Bodega"
process = "S"
criticality = "A"
priority = 2
code = "B-S-A1"
name = "Racks anclados"
file_url = "https://docs/racks.pdf"
"#;

#[test]
fn custom_catalog_parses() {
    let catalog = CatalogProvider::from_toml(SMALL).expect("parse");
    assert_eq!(catalog.roles, [Role::Auditor, Role::AreaManager]);
    assert_eq!(catalog.process_labels("Bodega"), ["S - Seguridad"]);
    let standard = &catalog.initial_standards[0];
    assert_eq!(standard.criticality, Criticality::A);
    assert_eq!(standard.file_url.as_deref(), Some("https://docs/racks.pdf"));
}

#[test]
fn catalog_file_overrides_builtin() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("catalog.toml");
    std::fs::write(&path, SMALL).expect("write");
    let catalog = CatalogProvider::load_or_builtin(Some(path.as_path())).expect("load");
    assert_eq!(catalog.areas, ["Bodega"]);

    let builtin = CatalogProvider::load_or_builtin(None).expect("builtin");
    assert_eq!(builtin.areas.len(), 3);
}

#[test]
fn missing_catalog_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("temp dir");
    assert!(CatalogProvider::load(&tmp.path().join("none.toml")).is_err());
}

#[test]
fn duplicate_ids_and_zero_priority_are_rejected() {
    let duplicated = format!(
        "{SMALL}\n[[standards]]\nid = \"b-s-a1\"\narea = \"Bodega\"\nprocess = \"S\"\n\
         criticality = \"B\"\npriority = 1\ncode = \"B-S-B1\"\nname = \"Otro\"\n"
    );
    assert!(CatalogProvider::from_toml(&duplicated).is_err());

    let zero = SMALL.replace("priority = 2", "priority = 0");
    assert!(CatalogProvider::from_toml(&zero).is_err());

    let unknown_process = SMALL.replace("process = \"S\"", "process = \"X\"");
    assert!(CatalogProvider::from_toml(&unknown_process).is_err());
}
