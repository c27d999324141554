//! Constructed artifacts: blocks, subcomponents and their parts.
//!
//! Values of these types only come out of the factory (or
//! deserialization followed by an explicit conformance check); their
//! structure always mirrors the schema.

use crate::agent::ScoringAgent;
use crate::error::FactoryError;
use crate::normalize::AnalysisResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use so6_schema::{SchemaDefinition, TabId, VisualTheme};

/// One rendered tab slot of a subcomponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Tab identifier, schema-fixed.
    pub id: TabId,
    /// Display label, schema-fixed.
    pub label: String,
    /// 1-based position, schema-fixed.
    pub order: u8,
    /// Whether rendering needs a scoring agent result.
    pub requires_agent: bool,
    /// Author-supplied or synthesized content for this tab.
    pub content: Value,
}

/// One worksheet field of a subcomponent.
///
/// `id`, `kind` and `required` are schema-fixed; `label` and
/// `placeholder` may carry author overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetField {
    /// Field identifier.
    pub id: String,
    /// Input control kind.
    pub kind: so6_schema::FieldKind,
    /// Whether a response is required.
    pub required: bool,
    /// Display label.
    pub label: String,
    /// Placeholder text.
    pub placeholder: String,
}

/// A single assessable unit: education content, worksheet, scoring
/// agent, resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcomponent {
    /// Stable identifier (author-supplied or slug of the title).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Exactly 5 tabs, in schema order.
    pub tabs: Vec<Tab>,
    /// Exactly 6 worksheet fields, in schema order.
    pub worksheet_fields: Vec<WorksheetField>,
    /// Wrapped scoring agent; not serialized.
    #[serde(skip)]
    pub agent: ScoringAgent,
    /// Resource records; unconstrained shape.
    pub resources: Vec<Value>,
    /// Copy of the schema visual theme.
    pub theme: VisualTheme,
}

impl Subcomponent {
    /// Check the structural invariants against the schema.
    ///
    /// The factory always constructs conformant subcomponents; this
    /// guards deserialized values and future code paths that bypass it.
    ///
    /// # Errors
    /// `FactoryError::StructuralInvariant` naming the first deviation.
    pub fn ensure_conformant(&self, schema: &SchemaDefinition) -> Result<(), FactoryError> {
        if self.tabs.len() != schema.tab_spec.len() {
            return Err(FactoryError::StructuralInvariant(format!(
                "subcomponent '{}' has {} tabs, expected {}",
                self.id,
                self.tabs.len(),
                schema.tab_spec.len()
            )));
        }
        for (tab, spec) in self.tabs.iter().zip(&schema.tab_spec) {
            if tab.id != spec.id {
                return Err(FactoryError::StructuralInvariant(format!(
                    "subcomponent '{}' has tab '{}' at position {}, expected '{}'",
                    self.id, tab.id, spec.order, spec.id
                )));
            }
        }

        if self.worksheet_fields.len() != schema.worksheet_field_spec.len() {
            return Err(FactoryError::StructuralInvariant(format!(
                "subcomponent '{}' has {} worksheet fields, expected {}",
                self.id,
                self.worksheet_fields.len(),
                schema.worksheet_field_spec.len()
            )));
        }
        for (field, spec) in self.worksheet_fields.iter().zip(&schema.worksheet_field_spec) {
            if field.id != spec.id || field.kind != spec.kind || field.required != spec.required {
                return Err(FactoryError::StructuralInvariant(format!(
                    "subcomponent '{}' field '{}' diverges from the schema",
                    self.id, field.id
                )));
            }
        }

        Ok(())
    }
}

/// Score aggregation policy for a block.
///
/// Deliberately not configurable: aggregation must never be
/// reimplemented inconsistently per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCalculation {
    /// Average of child subcomponent scores.
    Average,
}

impl ScoreCalculation {
    /// Apply the policy to a set of child scores.
    #[must_use]
    pub fn apply(&self, scores: &[u8]) -> f64 {
        match self {
            ScoreCalculation::Average => {
                if scores.is_empty() {
                    return 0.0;
                }
                #[allow(clippy::cast_precision_loss)]
                let total: f64 = scores.iter().map(|s| f64::from(*s)).sum();
                total / scores.len() as f64
            }
        }
    }
}

/// Top-level grouping of subcomponents for one framework stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Stable identifier (author-supplied or slug of the title).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Position in the fixed 16-block catalog.
    pub number: u8,
    /// Verbatim copy of the schema block layout.
    pub structure: so6_schema::BlockLayout,
    /// Child subcomponents.
    pub subcomponents: Vec<Subcomponent>,
    /// Score aggregation policy; always [`ScoreCalculation::Average`].
    pub score_calculation: ScoreCalculation,
}

impl Block {
    /// Aggregate child analysis results under the block's policy.
    #[must_use]
    pub fn aggregate_score(&self, results: &[AnalysisResult]) -> f64 {
        let scores: Vec<u8> = results.iter().map(|r| r.score).collect();
        self.score_calculation.apply(&scores)
    }

    /// Check the structural invariants against the schema.
    ///
    /// # Errors
    /// `FactoryError::StructuralInvariant` if the attached structure
    /// diverges from the schema or any child is non-conformant.
    pub fn ensure_conformant(&self, schema: &SchemaDefinition) -> Result<(), FactoryError> {
        if self.structure != schema.block_layout {
            return Err(FactoryError::StructuralInvariant(format!(
                "block '{}' structure diverges from the schema layout",
                self.id
            )));
        }
        if !(1..=16).contains(&self.number) {
            return Err(FactoryError::StructuralInvariant(format!(
                "block '{}' number {} is outside 1..=16",
                self.id, self.number
            )));
        }
        for subcomponent in &self.subcomponents {
            subcomponent.ensure_conformant(schema)?;
        }
        Ok(())
    }
}

/// Tagged union over the two constructible component shapes.
///
/// Dispatch is a pattern match, never shape-sniffing.
#[derive(Debug, Clone)]
pub enum Component {
    /// A single assessable unit.
    Subcomponent(Subcomponent),
    /// A grouping of subcomponents.
    Block(Block),
}

/// Discriminant of [`Component`], also derivable from untyped values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// A single assessable unit.
    Subcomponent,
    /// A grouping of subcomponents.
    Block,
}

impl Component {
    /// The component's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Subcomponent(_) => ComponentKind::Subcomponent,
            Component::Block(_) => ComponentKind::Block,
        }
    }

    /// Classify a serialized component by shape.
    ///
    /// Used when re-hydrating values of unknown provenance; typed code
    /// should match on [`Component`] directly.
    ///
    /// # Errors
    /// `FactoryError::UnknownComponentType` when the value has neither
    /// a `tabs` nor a `subcomponents` array.
    pub fn kind_of(value: &Value) -> Result<ComponentKind, FactoryError> {
        if value.get("tabs").is_some_and(Value::is_array) {
            return Ok(ComponentKind::Subcomponent);
        }
        if value.get("subcomponents").is_some_and(Value::is_array) {
            return Ok(ComponentKind::Block);
        }
        Err(FactoryError::UnknownComponentType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn average_policy() {
        let policy = ScoreCalculation::Average;
        assert!((policy.apply(&[80, 60, 70]) - 70.0).abs() < f64::EPSILON);
        assert!((policy.apply(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn kind_of_subcomponent_shape() {
        let value = json!({ "tabs": [], "title": "x" });
        assert_eq!(
            Component::kind_of(&value).unwrap(),
            ComponentKind::Subcomponent
        );
    }

    #[test]
    fn kind_of_block_shape() {
        let value = json!({ "subcomponents": [] });
        assert_eq!(Component::kind_of(&value).unwrap(), ComponentKind::Block);
    }

    #[test]
    fn kind_of_rejects_other_shapes() {
        for value in [json!({ "title": "x" }), json!(42), json!({ "tabs": "nope" })] {
            assert!(matches!(
                Component::kind_of(&value),
                Err(FactoryError::UnknownComponentType)
            ));
        }
    }
}
