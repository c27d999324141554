//! Compliance reporting types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue severity.
///
/// Errors block release; warnings are advisory (cosmetic drift is
/// tolerated, structural drift is not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural deviation; the artifact set is non-compliant.
    Error,
    /// Advisory deviation.
    Warning,
}

/// One deviation found while auditing an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity of the deviation.
    pub severity: Severity,
    /// Name of the artifact (or `"schema"` for integrity checks).
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Create an error-severity issue.
    #[inline]
    #[must_use]
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            source: source.into(),
            message: message.into(),
        }
    }

    /// Create a warning-severity issue.
    #[inline]
    #[must_use]
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            source: source.into(),
            message: message.into(),
        }
    }

    /// Whether this issue blocks compliance.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Source and message of an issue, as recorded in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Name of the artifact the issue was found in.
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

impl From<&Issue> for IssueRecord {
    fn from(issue: &Issue) -> Self {
        Self {
            source: issue.source.clone(),
            message: issue.message.clone(),
        }
    }
}

/// Aggregate result of one validation run.
///
/// Created fresh per run and immutable once returned; persisting it
/// (e.g. to a JSON file) is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// When the run happened.
    pub timestamp: DateTime<Utc>,
    /// Artifacts examined.
    pub validated: usize,
    /// Artifacts with no errors.
    pub passed: usize,
    /// Artifacts with at least one error.
    pub failed: usize,
    /// `passed / validated * 100`, or 0 for an empty run.
    pub compliance_rate: f64,
    /// Error-severity findings.
    pub errors: Vec<IssueRecord>,
    /// Warning-severity findings.
    pub warnings: Vec<IssueRecord>,
}

impl ComplianceReport {
    /// Whether the artifact set can be released.
    #[inline]
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_constructors() {
        let error = Issue::error("page.html", "tab count mismatch: found 4, expected 5");
        assert!(error.is_error());

        let warning = Issue::warning("page.html", "theme color missing");
        assert!(!warning.is_error());
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = ComplianceReport {
            timestamp: Utc::now(),
            validated: 2,
            passed: 1,
            failed: 1,
            compliance_rate: 50.0,
            errors: vec![],
            warnings: vec![],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("complianceRate").is_some());
    }
}
