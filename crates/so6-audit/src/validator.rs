//! Structural audit of rendered artifacts against the schema.
//!
//! The validator does not trust that an artifact came out of the
//! factory: pages may have been hand-edited after rendering. It only
//! reports; it never mutates or repairs. Scans are read-only and
//! independent per artifact.

use crate::report::{ComplianceReport, Issue, IssueRecord};
use chrono::Utc;
use serde_json::Value;
use so6_schema::{SchemaDefinition, SchemaRegistry};
use std::collections::HashSet;
use std::path::Path;

/// Errors while loading artifacts from disk.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Reading the artifact file failed.
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path of the artifact file.
        path: String,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// A `.json` artifact is not valid JSON.
    #[error("parse error in {path}: {source}")]
    Parse {
        /// Path of the artifact file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// A rendered artifact offered for audit.
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Rendered page text, scanned for structural markers.
    Markup {
        /// Artifact name, used as the issue source.
        name: String,
        /// The rendered text.
        text: String,
    },
    /// A serialized component tree, introspected as objects.
    Tree {
        /// Artifact name, used as the issue source.
        name: String,
        /// The serialized component.
        value: Value,
    },
}

impl ArtifactSource {
    /// Wrap rendered page text.
    #[inline]
    #[must_use]
    pub fn markup(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Markup {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Wrap a serialized component tree.
    #[inline]
    #[must_use]
    pub fn tree(name: impl Into<String>, value: Value) -> Self {
        Self::Tree {
            name: name.into(),
            value,
        }
    }

    /// The artifact's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Markup { name, .. } | Self::Tree { name, .. } => name,
        }
    }

    /// Load an artifact from a file, classified by extension:
    /// `.html`/`.htm`/`.md` as markup, `.json` as an object tree.
    ///
    /// Returns `Ok(None)` for unrecognized extensions.
    ///
    /// # Errors
    /// `AuditError::Io` when the file cannot be read, `AuditError::Parse`
    /// when a `.json` artifact is not valid JSON.
    pub fn from_path(path: &Path) -> Result<Option<Self>, AuditError> {
        let name = path.display().to_string();
        let read = |name: &str| {
            std::fs::read_to_string(path).map_err(|source| AuditError::Io {
                path: name.to_string(),
                source,
            })
        };

        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "html" | "htm" | "md" => {
                let text = read(&name)?;
                Ok(Some(Self::markup(name, text)))
            }
            "json" => {
                let text = read(&name)?;
                let value = serde_json::from_str(&text).map_err(|source| AuditError::Parse {
                    path: name.clone(),
                    source,
                })?;
                Ok(Some(Self::tree(name, value)))
            }
            _ => Ok(None),
        }
    }
}

/// Read-only structural auditor.
#[derive(Debug, Clone, Copy)]
pub struct StructureValidator<'s> {
    schema: &'s SchemaDefinition,
}

impl<'s> StructureValidator<'s> {
    /// Create a validator over a sealed registry.
    #[inline]
    #[must_use]
    pub fn new(registry: &'s SchemaRegistry) -> Self {
        Self {
            schema: registry.schema(),
        }
    }

    /// Create a validator over an explicit definition.
    #[inline]
    #[must_use]
    pub fn with_schema(schema: &'s SchemaDefinition) -> Self {
        Self { schema }
    }

    /// Audit one artifact, returning every deviation found.
    #[must_use]
    pub fn validate_artifact(&self, artifact: &ArtifactSource) -> Vec<Issue> {
        match artifact {
            ArtifactSource::Markup { name, text } => self.scan_markup(name, text),
            ArtifactSource::Tree { name, value } => self.scan_tree(name, value),
        }
    }

    /// Audit a collection and fold the findings into a report.
    #[must_use]
    pub fn validate_batch(&self, artifacts: &[ArtifactSource]) -> ComplianceReport {
        let mut validated = 0usize;
        let mut passed = 0usize;
        let mut failed = 0usize;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for artifact in artifacts {
            validated += 1;
            let issues = self.validate_artifact(artifact);
            if issues.iter().any(Issue::is_error) {
                failed += 1;
            } else {
                passed += 1;
            }
            for issue in &issues {
                let record = IssueRecord::from(issue);
                if issue.is_error() {
                    errors.push(record);
                } else {
                    warnings.push(record);
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let compliance_rate = if validated == 0 {
            100.0
        } else {
            passed as f64 / validated as f64 * 100.0
        };

        tracing::info!(validated, passed, failed, "compliance audit finished");

        ComplianceReport {
            timestamp: Utc::now(),
            validated,
            passed,
            failed,
            compliance_rate,
            errors,
            warnings,
        }
    }

    /// Sanity-check the registry itself; startup/build-time use.
    #[must_use]
    pub fn validate_schema_integrity(registry: &SchemaRegistry) -> Vec<Issue> {
        let mut issues = Vec::new();
        let source = "schema";

        if !registry.is_sealed() {
            issues.push(Issue::error(source, "registry is not sealed"));
            return issues;
        }
        let schema = registry.schema();

        if schema.tab_spec.len() != 5 {
            issues.push(Issue::error(
                source,
                format!("tab count mismatch: found {}, expected 5", schema.tab_spec.len()),
            ));
        }
        let distinct_tabs: HashSet<_> = schema.tab_spec.iter().map(|t| t.id).collect();
        if distinct_tabs.len() != schema.tab_spec.len() {
            issues.push(Issue::error(source, "duplicate tab ids"));
        }
        for (index, tab) in schema.tab_spec.iter().enumerate() {
            if usize::from(tab.order) != index + 1 {
                issues.push(Issue::error(
                    source,
                    format!("tab '{}' order {} breaks the 1..=5 sequence", tab.id, tab.order),
                ));
            }
        }

        if schema.worksheet_field_spec.len() != 6 {
            issues.push(Issue::error(
                source,
                format!(
                    "worksheet field count mismatch: found {}, expected 6",
                    schema.worksheet_field_spec.len()
                ),
            ));
        }

        let scoring = &schema.scoring_spec;
        if scoring.dimension_count * usize::from(scoring.max_per_dimension)
            != usize::from(scoring.total_max)
        {
            issues.push(Issue::error(
                source,
                format!(
                    "{} dimensions x {} points != total max {}",
                    scoring.dimension_count, scoring.max_per_dimension, scoring.total_max
                ),
            ));
        }
        if scoring.dimension_count * usize::from(scoring.weight_per_dimension) != 100 {
            issues.push(Issue::error(source, "dimension weights do not sum to 100"));
        }
        if scoring.default_dimensions.len() != scoring.dimension_count {
            issues.push(Issue::error(
                source,
                "default dimension keys do not match the dimension count",
            ));
        }

        issues
    }

    fn scan_markup(&self, name: &str, text: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        let expected_tabs = self.schema.tab_spec.len();
        let tabs = attr_values(text, "data-tab");
        if tabs.len() != expected_tabs {
            issues.push(Issue::error(
                name,
                format!(
                    "tab count mismatch: found {}, expected {expected_tabs}",
                    tabs.len()
                ),
            ));
        }

        let expected_fields = self.schema.worksheet_field_spec.len();
        let fields = attr_values(text, "data-field");
        if fields.len() != expected_fields {
            issues.push(Issue::error(
                name,
                format!(
                    "worksheet field count mismatch: found {}, expected {expected_fields}",
                    fields.len()
                ),
            ));
        }

        let dimensions: HashSet<&str> = attr_values(text, "data-dimension").into_iter().collect();
        let expected_dimensions = self.schema.scoring_spec.dimension_count;
        if !dimensions.is_empty() && dimensions.len() != expected_dimensions {
            issues.push(Issue::error(
                name,
                format!(
                    "scoring dimension mismatch: found {} distinct, expected {expected_dimensions}",
                    dimensions.len()
                ),
            ));
        }

        let sections: HashSet<&str> = attr_values(text, "data-section").into_iter().collect();
        for tab in &self.schema.tab_spec {
            if !sections.contains(tab.id.as_str()) {
                issues.push(Issue::error(
                    name,
                    format!("missing required section: {}", tab.id),
                ));
            }
        }

        let primary = &self.schema.visual_theme.primary;
        if !text.contains(primary.as_str()) {
            issues.push(Issue::warning(
                name,
                format!("theme color {primary} not found"),
            ));
        }

        issues
    }

    fn scan_tree(&self, name: &str, value: &Value) -> Vec<Issue> {
        if let Some(children) = value.get("subcomponents").and_then(Value::as_array) {
            return self.scan_block_tree(name, value, children);
        }
        self.scan_subcomponent_tree(name, value)
    }

    fn scan_block_tree(&self, name: &str, value: &Value, children: &[Value]) -> Vec<Issue> {
        let mut issues = Vec::new();

        match serde_json::to_value(&self.schema.block_layout) {
            Ok(expected) if value.get("structure") == Some(&expected) => {}
            _ => {
                issues.push(Issue::error(
                    name,
                    "block structure diverges from schema layout",
                ));
            }
        }

        for (index, child) in children.iter().enumerate() {
            let child_name = format!("{name}#subcomponent-{index}");
            issues.extend(self.scan_subcomponent_tree(&child_name, child));
        }

        issues
    }

    fn scan_subcomponent_tree(&self, name: &str, value: &Value) -> Vec<Issue> {
        let mut issues = Vec::new();

        let tabs = value.get("tabs").and_then(Value::as_array);
        let tab_count = tabs.map_or(0, Vec::len);
        let expected_tabs = self.schema.tab_spec.len();
        if tab_count != expected_tabs {
            issues.push(Issue::error(
                name,
                format!("tab count mismatch: found {tab_count}, expected {expected_tabs}"),
            ));
        }

        for spec in &self.schema.tab_spec {
            let present = tabs.is_some_and(|tabs| {
                tabs.iter().any(|tab| {
                    tab.get("id").and_then(Value::as_str) == Some(spec.id.as_str())
                        && tab.get("content").is_some_and(|c| !c.is_null())
                })
            });
            if !present {
                issues.push(Issue::error(
                    name,
                    format!("missing required section: {}", spec.id),
                ));
            }
        }

        let field_count = value
            .get("worksheetFields")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let expected_fields = self.schema.worksheet_field_spec.len();
        if field_count != expected_fields {
            issues.push(Issue::error(
                name,
                format!(
                    "worksheet field count mismatch: found {field_count}, expected {expected_fields}"
                ),
            ));
        }

        if let Some(dimensions) = value.get("detailedScores").and_then(Value::as_object) {
            let expected_dimensions = self.schema.scoring_spec.dimension_count;
            if dimensions.len() != expected_dimensions {
                issues.push(Issue::error(
                    name,
                    format!(
                        "scoring dimension mismatch: found {} distinct, expected {expected_dimensions}",
                        dimensions.len()
                    ),
                ));
            }
        }

        let theme_matches = value
            .get("theme")
            .and_then(|t| t.get("primary"))
            .and_then(Value::as_str)
            == Some(self.schema.visual_theme.primary.as_str());
        if !theme_matches {
            issues.push(Issue::warning(
                name,
                "theme primary color missing or diverges from schema",
            ));
        }

        issues
    }
}

/// Collect the values of every `attr="..."` occurrence in `text`.
fn attr_values<'t>(text: &'t str, attr: &str) -> Vec<&'t str> {
    let needle = format!("{attr}=\"");
    let mut values = Vec::new();
    let mut rest = text;
    while let Some(position) = rest.find(&needle) {
        let after = &rest[position + needle.len()..];
        let Some(end) = after.find('"') else { break };
        values.push(&after[..end]);
        rest = &after[end..];
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validator() -> StructureValidator<'static> {
        StructureValidator::new(SchemaRegistry::shared())
    }

    fn markup_page(tab_count: usize) -> String {
        let schema = SchemaRegistry::shared().schema();
        let mut page = String::from("<main>");
        for tab in schema.tab_spec.iter().take(tab_count) {
            page.push_str(&format!("<button data-tab=\"{}\"></button>", tab.id));
            page.push_str(&format!("<div data-section=\"{}\"></div>", tab.id));
        }
        for field in &schema.worksheet_field_spec {
            page.push_str(&format!("<input data-field=\"{}\">", field.id));
        }
        for dimension in &schema.scoring_spec.default_dimensions {
            page.push_str(&format!("<div data-dimension=\"{dimension}\"></div>"));
        }
        page.push_str(&format!("<style>.accent {{ color: {}; }}</style>", schema.visual_theme.primary));
        page.push_str("</main>");
        page
    }

    #[test]
    fn conformant_markup_passes_clean() {
        let artifact = ArtifactSource::markup("page.html", markup_page(5));
        assert!(validator().validate_artifact(&artifact).is_empty());
    }

    #[test]
    fn four_tab_markup_reports_the_exact_mismatch() {
        let artifact = ArtifactSource::markup("page.html", markup_page(4));
        let issues = validator().validate_artifact(&artifact);

        assert!(issues
            .iter()
            .any(|i| i.message == "tab count mismatch: found 4, expected 5"));
        // the dropped tab's content region is reported too
        assert!(issues
            .iter()
            .any(|i| i.message == "missing required section: history"));
    }

    #[test]
    fn missing_theme_is_only_a_warning() {
        let page = markup_page(5).replace("#FF5500", "#123456");
        let artifact = ArtifactSource::markup("page.html", page);
        let issues = validator().validate_artifact(&artifact);

        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn duplicate_dimension_markers_count_once() {
        let mut page = markup_page(5);
        page.push_str("<div data-dimension=\"clarity\"></div>");
        let artifact = ArtifactSource::markup("page.html", page);
        assert!(validator().validate_artifact(&artifact).is_empty());
    }

    #[test]
    fn six_dimension_markup_is_an_error() {
        let mut page = markup_page(5);
        page.push_str("<div data-dimension=\"extra\"></div>");
        let artifact = ArtifactSource::markup("page.html", page);
        let issues = validator().validate_artifact(&artifact);
        assert!(issues
            .iter()
            .any(|i| i.message.contains("scoring dimension mismatch: found 6 distinct")));
    }

    #[test]
    fn batch_report_counts_pass_and_fail() {
        let artifacts = vec![
            ArtifactSource::markup("four-tabs.html", markup_page(4)),
            ArtifactSource::markup("five-tabs.html", markup_page(5)),
        ];
        let report = validator().validate_batch(&artifacts);

        assert_eq!(report.validated, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!((report.compliance_rate - 50.0).abs() < f64::EPSILON);
        assert!(report
            .errors
            .iter()
            .any(|e| e.message == "tab count mismatch: found 4, expected 5"));
        assert!(!report.is_compliant());
    }

    #[test]
    fn empty_batch_is_compliant() {
        let report = validator().validate_batch(&[]);
        assert_eq!(report.validated, 0);
        assert!(report.is_compliant());
        assert!((report.compliance_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tree_with_wrong_field_count_fails() {
        let schema = SchemaRegistry::shared().schema();
        let tabs: Vec<Value> = schema
            .tab_spec
            .iter()
            .map(|t| json!({ "id": t.id.as_str(), "content": {} }))
            .collect();
        let value = json!({
            "tabs": tabs,
            "worksheetFields": [{}, {}, {}],
            "theme": { "primary": schema.visual_theme.primary }
        });

        let issues = validator().validate_artifact(&ArtifactSource::tree("sub.json", value));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "worksheet field count mismatch: found 3, expected 6"
        );
    }

    #[test]
    fn schema_integrity_of_shared_registry_is_clean() {
        let issues = StructureValidator::validate_schema_integrity(SchemaRegistry::shared());
        assert!(issues.is_empty());
    }
}
