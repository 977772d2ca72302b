//! Checklist selection: which standards an audit of an area inspects.
//!
//! For every process the checklist takes the most urgent standards of each
//! criticality tier up to a fixed quota (3 A, 2 B, 1 C). Shortfalls are not
//! errors; the checklist is simply shorter. Output order is a pure function
//! of the input order, so the same catalog snapshot always yields the same
//! checklist.

use crate::types::{Criticality, Standard};

/// Per-process quota, in output order.
pub const QUOTA: [(Criticality, usize); 3] =
    [(Criticality::A, 3), (Criticality::B, 2), (Criticality::C, 1)];

/// Largest number of items a single process can contribute.
pub const MAX_PER_PROCESS: usize = 6;

/// One selected checklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick<'a> {
    /// Process code the standard was selected for.
    pub process: &'a str,
    /// The selected standard.
    pub standard: &'a Standard,
}

/// Select the checklist for `area` over `processes`.
///
/// Processes are emitted in input order; within a process, A picks precede
/// B picks precede C picks. Within a tier, standards are ordered by
/// ascending priority and equal priorities keep catalog order.
pub fn select<'a>(
    standards: &'a [Standard],
    area: &str,
    processes: &'a [String],
) -> Vec<Pick<'a>> {
    let mut picks = Vec::new();
    for process in processes {
        let subset: Vec<&Standard> = standards
            .iter()
            .filter(|s| s.area == area && s.process == *process)
            .collect();

        for (criticality, quota) in QUOTA {
            let mut tier: Vec<&Standard> = subset
                .iter()
                .copied()
                .filter(|s| s.criticality == criticality)
                .collect();
            // Stable sort keeps catalog order among equal priorities.
            tier.sort_by_key(|s| s.priority);
            picks.extend(tier.into_iter().take(quota).map(|standard| Pick {
                process: process.as_str(),
                standard,
            }));
        }
    }
    picks
}
