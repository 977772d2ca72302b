//! Auditora: local-first compliance audits.
//!
//! An Auditor creates an audit of an area; the checklist is selected from
//! the standards catalog by criticality quota. Findings recorded as `NO`
//! spawn remediation plans that Area Managers assign and progress and
//! Auditors reprogram or verify. Every role-sensitive operation passes
//! through [`policy::authorize`].
//!
//! See `DESIGN.md` for the module map.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod store;
pub mod types;

pub mod catalog;
pub mod policy;
pub mod selection;

pub mod audit;
pub mod lifecycle;
pub mod summary;
pub mod users;

pub mod session;

pub use error::{AuditError, Result};
pub use session::Session;
