//! Static catalog configuration and the standards collection.
//!
//! [`CatalogProvider`] holds the reference data every session starts from:
//! roles, areas, the processes audited in each area, process names and the
//! seed standards. It is loaded once per session, from the built-in TOML or
//! from a file named in the configuration.

pub mod standards;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::types::{Role, Standard};

pub use self::standards::{NewStandard, StandardsCatalog};

/// Catalog shipped with the binary.
const DEFAULT_CATALOG: &str = include_str!("default_catalog.toml");

/// Reference data for areas, processes and seed standards.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProvider {
    /// Roles users can declare.
    pub roles: Vec<Role>,
    /// Known areas in display order.
    pub areas: Vec<String>,
    /// Process codes audited in each area, in checklist order.
    #[serde(default)]
    pub area_processes: BTreeMap<String, Vec<String>>,
    /// Display name of each process code.
    #[serde(default)]
    pub process_names: BTreeMap<String, String>,
    /// Standards a fresh data directory is seeded with.
    #[serde(default, rename = "standards")]
    pub initial_standards: Vec<Standard>,
}

impl CatalogProvider {
    /// The built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded TOML is malformed.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_toml(DEFAULT_CATALOG).context("built-in catalog is invalid")
    }

    /// Parse and validate a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on parse failure or when [`CatalogProvider::validate`]
    /// rejects the content.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let catalog: CatalogProvider =
            toml::from_str(toml_str).context("failed to parse catalog TOML")?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog at {}", path.display()))?;
        tracing::info!(path = %path.display(), "loading catalog from file");
        Self::from_toml(&contents)
            .with_context(|| format!("invalid catalog at {}", path.display()))
    }

    /// Load `path` when given, otherwise the built-in catalog.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CatalogProvider::load`] or
    /// [`CatalogProvider::builtin`].
    pub fn load_or_builtin(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Check internal consistency.
    ///
    /// Every mapped area must be listed, every seed standard must reference a
    /// known area and process, priorities must be positive and ids unique.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> anyhow::Result<()> {
        for area in self.area_processes.keys() {
            if !self.has_area(area) {
                anyhow::bail!("area_processes references unknown area '{area}'");
            }
        }
        let mut seen = HashSet::new();
        for standard in &self.initial_standards {
            if !seen.insert(standard.id.as_str()) {
                anyhow::bail!("duplicate standard id '{}'", standard.id);
            }
            if !self.has_area(&standard.area) {
                anyhow::bail!(
                    "standard {} has unknown area '{}'",
                    standard.code,
                    standard.area
                );
            }
            if !self.has_process(&standard.process) {
                anyhow::bail!(
                    "standard {} has unknown process '{}'",
                    standard.code,
                    standard.process
                );
            }
            if standard.priority == 0 {
                anyhow::bail!("standard {} has non-positive priority", standard.code);
            }
        }
        Ok(())
    }

    /// Process codes audited in `area`. Unknown areas have none.
    pub fn processes_for(&self, area: &str) -> &[String] {
        self.area_processes
            .get(area)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Display name of a process code.
    pub fn process_name(&self, code: &str) -> Option<&str> {
        self.process_names.get(code).map(String::as_str)
    }

    /// `"<code> - <name>"`, with an empty name for unknown codes.
    pub fn process_label(&self, code: &str) -> String {
        format!("{code} - {}", self.process_name(code).unwrap_or(""))
    }

    /// Labels for every process of `area`, in checklist order.
    pub fn process_labels(&self, area: &str) -> Vec<String> {
        self.processes_for(area)
            .iter()
            .map(|code| self.process_label(code))
            .collect()
    }

    /// Whether `area` is a listed area.
    pub fn has_area(&self, area: &str) -> bool {
        self.areas.iter().any(|a| a == area)
    }

    /// Whether `code` is a named process.
    pub fn has_process(&self, code: &str) -> bool {
        self.process_names.contains_key(code)
    }
}
