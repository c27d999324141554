//! SO6 Audit - offline structural compliance auditing
//!
//! Independently audits already-rendered artifacts (markup pages or
//! serialized component trees) against the locked schema, producing a
//! pass/fail [`ComplianceReport`] for build pipelines. The auditor
//! never trusts that artifacts came out of the factory, and it never
//! repairs - it only reports.
//!
//! # Example
//!
//! ```rust
//! use so6_audit::{ArtifactSource, StructureValidator};
//! use so6_schema::SchemaRegistry;
//!
//! let validator = StructureValidator::new(SchemaRegistry::shared());
//! let report = validator.validate_batch(&[ArtifactSource::markup("page.html", "<main></main>")]);
//! assert_eq!(report.failed, 1);
//! ```

pub mod report;
pub mod validator;

pub use report::{ComplianceReport, Issue, IssueRecord, Severity};
pub use validator::{ArtifactSource, AuditError, StructureValidator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
