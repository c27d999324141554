//! The structural contract every block and subcomponent must satisfy.
//!
//! One `SchemaDefinition` exists per process. It fixes the tab set (5),
//! the worksheet field set (6), the scoring arithmetic (5 dimensions of
//! 20 points each) and the block-level layout. Everything here is plain
//! data; behavior lives in the registry and its consumers.

use serde::{Deserialize, Serialize};

/// Identifier of a subcomponent tab.
///
/// The tab set is closed: every subcomponent carries exactly these five
/// tabs, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabId {
    /// Educational content for the subcomponent topic.
    Education,
    /// The interactive worksheet.
    Workspace,
    /// Score breakdown and recommendations.
    Analysis,
    /// Templates, guides and other reference material.
    Resources,
    /// Past score history.
    History,
}

impl TabId {
    /// All tab ids in canonical display order.
    pub const ALL: [TabId; 5] = [
        TabId::Education,
        TabId::Workspace,
        TabId::Analysis,
        TabId::Resources,
        TabId::History,
    ];

    /// Stable string form, as used in rendered markup and serialized trees.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TabId::Education => "education",
            TabId::Workspace => "workspace",
            TabId::Analysis => "analysis",
            TabId::Resources => "resources",
            TabId::History => "history",
        }
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of one tab slot in the locked template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSpec {
    /// Tab identifier.
    pub id: TabId,
    /// Display label.
    pub label: String,
    /// 1-based position; the five specs form a contiguous 1..=5 sequence.
    pub order: u8,
    /// Whether rendering this tab needs a scoring agent result.
    pub requires_agent: bool,
}

/// Input control kind for a worksheet field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Single-line text input.
    ShortText,
    /// Multi-line text area.
    LongText,
}

/// Descriptor of one worksheet field slot.
///
/// `id`, `kind` and `required` are schema-fixed; `label` and
/// `placeholder` are the defaults authors may override per subcomponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetFieldSpec {
    /// Field identifier, the key under which responses are collected.
    pub id: String,
    /// Input control kind.
    pub kind: FieldKind,
    /// Whether a response is required before scoring.
    pub required: bool,
    /// Default display label.
    pub label: String,
    /// Default placeholder text.
    pub placeholder: String,
}

/// Scoring arithmetic shared by the factory, normalizer and auditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSpec {
    /// Number of scoring dimensions.
    pub dimension_count: usize,
    /// Maximum points per dimension.
    pub max_per_dimension: u8,
    /// Maximum total score.
    pub total_max: u8,
    /// Weight of each dimension, in percent.
    pub weight_per_dimension: u8,
    /// Canonical dimension keys used when agent output must be replaced
    /// with a neutral default map.
    pub default_dimensions: Vec<String>,
}

/// Block-level page layout, attached verbatim to every constructed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayout {
    /// Header region: title and description.
    pub header: HeaderSpec,
    /// Aggregate score display region.
    pub score_display: ScoreDisplaySpec,
    /// Subcomponent card grid region.
    pub grid: GridSpec,
}

/// Header region configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSpec {
    /// Whether the block number badge is shown.
    pub show_number: bool,
    /// Whether the block description is shown under the title.
    pub show_description: bool,
}

/// Score display region configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDisplaySpec {
    /// Display style tag, e.g. `"radial"`.
    pub style: String,
    /// Whether the per-subcomponent breakdown is listed.
    pub show_breakdown: bool,
}

/// Subcomponent grid region configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    /// Number of card columns.
    pub columns: u8,
    /// Card style tag.
    pub card_style: String,
}

/// Visual theme constants, carried through to constructed subcomponents.
///
/// Not behaviorally load-bearing; the auditor only checks for their
/// presence as an advisory signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualTheme {
    /// Primary brand color.
    pub primary: String,
    /// Accent color.
    pub accent: String,
    /// Page background color.
    pub background: String,
    /// Body text color.
    pub text: String,
}

/// Interaction behavior configuration, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionPatterns {
    /// Tab switching behavior tag.
    pub tab_switching: String,
    /// Worksheet auto-save interval in milliseconds.
    pub autosave_interval_ms: u64,
    /// Whether score changes animate.
    pub animate_scores: bool,
}

/// The one true structural contract.
///
/// Immutable after construction; see `SchemaRegistry` for the sealing
/// mechanism and consistency validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    /// Semantic version of the schema revision.
    pub version: String,
    /// The five tab slots, in display order.
    pub tab_spec: Vec<TabSpec>,
    /// The six worksheet field slots, in display order.
    pub worksheet_field_spec: Vec<WorksheetFieldSpec>,
    /// Scoring arithmetic.
    pub scoring_spec: ScoringSpec,
    /// Block-level layout.
    pub block_layout: BlockLayout,
    /// Visual theme constants.
    pub visual_theme: VisualTheme,
    /// Interaction behavior configuration.
    pub interaction_patterns: InteractionPatterns,
}

/// Number of tabs every subcomponent must carry.
pub const TAB_COUNT: usize = 5;

/// Number of worksheet fields every subcomponent must carry.
pub const WORKSHEET_FIELD_COUNT: usize = 6;

impl SchemaDefinition {
    /// The built-in definition the registry installs at bootstrap.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: "2.0.0".to_string(),
            tab_spec: vec![
                TabSpec {
                    id: TabId::Education,
                    label: "Education".to_string(),
                    order: 1,
                    requires_agent: false,
                },
                TabSpec {
                    id: TabId::Workspace,
                    label: "Workspace".to_string(),
                    order: 2,
                    requires_agent: false,
                },
                TabSpec {
                    id: TabId::Analysis,
                    label: "Analysis".to_string(),
                    order: 3,
                    requires_agent: true,
                },
                TabSpec {
                    id: TabId::Resources,
                    label: "Resources".to_string(),
                    order: 4,
                    requires_agent: false,
                },
                TabSpec {
                    id: TabId::History,
                    label: "Score History".to_string(),
                    order: 5,
                    requires_agent: false,
                },
            ],
            worksheet_field_spec: vec![
                WorksheetFieldSpec {
                    id: "who-affected".to_string(),
                    kind: FieldKind::ShortText,
                    required: true,
                    label: "Who is affected?".to_string(),
                    placeholder: "Describe the specific customer or segment".to_string(),
                },
                WorksheetFieldSpec {
                    id: "what-problem".to_string(),
                    kind: FieldKind::LongText,
                    required: true,
                    label: "What is the problem?".to_string(),
                    placeholder: "State the problem in one or two sentences".to_string(),
                },
                WorksheetFieldSpec {
                    id: "when-occur".to_string(),
                    kind: FieldKind::ShortText,
                    required: true,
                    label: "When does it occur?".to_string(),
                    placeholder: "Describe the triggering situation".to_string(),
                },
                WorksheetFieldSpec {
                    id: "what-impact".to_string(),
                    kind: FieldKind::LongText,
                    required: true,
                    label: "What is the impact?".to_string(),
                    placeholder: "Quantify the cost of the problem".to_string(),
                },
                WorksheetFieldSpec {
                    id: "how-solving".to_string(),
                    kind: FieldKind::LongText,
                    required: true,
                    label: "How are they solving it today?".to_string(),
                    placeholder: "Describe current workarounds or competitors".to_string(),
                },
                WorksheetFieldSpec {
                    id: "evidence".to_string(),
                    kind: FieldKind::LongText,
                    required: false,
                    label: "What evidence do you have?".to_string(),
                    placeholder: "Interviews, data points, quotes".to_string(),
                },
            ],
            scoring_spec: ScoringSpec {
                dimension_count: 5,
                max_per_dimension: 20,
                total_max: 100,
                weight_per_dimension: 20,
                default_dimensions: vec![
                    "clarity".to_string(),
                    "specificity".to_string(),
                    "evidence".to_string(),
                    "alignment".to_string(),
                    "actionability".to_string(),
                ],
            },
            block_layout: BlockLayout {
                header: HeaderSpec {
                    show_number: true,
                    show_description: true,
                },
                score_display: ScoreDisplaySpec {
                    style: "radial".to_string(),
                    show_breakdown: true,
                },
                grid: GridSpec {
                    columns: 3,
                    card_style: "elevated".to_string(),
                },
            },
            visual_theme: VisualTheme {
                primary: "#FF5500".to_string(),
                accent: "#1A1A2E".to_string(),
                background: "#FAFAFA".to_string(),
                text: "#2D2D2D".to_string(),
            },
            interaction_patterns: InteractionPatterns {
                tab_switching: "instant".to_string(),
                autosave_interval_ms: 30_000,
                animate_scores: true,
            },
        }
    }

    /// Look up a tab spec by id.
    #[inline]
    #[must_use]
    pub fn tab(&self, id: TabId) -> Option<&TabSpec> {
        self.tab_spec.iter().find(|t| t.id == id)
    }

    /// Look up a worksheet field spec by id.
    #[inline]
    #[must_use]
    pub fn worksheet_field(&self, id: &str) -> Option<&WorksheetFieldSpec> {
        self.worksheet_field_spec.iter().find(|f| f.id == id)
    }

    /// Worksheet field ids in display order.
    #[must_use]
    pub fn worksheet_field_ids(&self) -> Vec<String> {
        self.worksheet_field_spec
            .iter()
            .map(|f| f.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tab_order_is_canonical() {
        let def = SchemaDefinition::builtin();
        let ids: Vec<TabId> = def.tab_spec.iter().map(|t| t.id).collect();
        assert_eq!(ids, TabId::ALL);
    }

    #[test]
    fn builtin_field_count() {
        let def = SchemaDefinition::builtin();
        assert_eq!(def.worksheet_field_spec.len(), WORKSHEET_FIELD_COUNT);
    }

    #[test]
    fn tab_id_serializes_lowercase() {
        let json = serde_json::to_string(&TabId::Education).unwrap();
        assert_eq!(json, "\"education\"");
    }

    #[test]
    fn tab_lookup() {
        let def = SchemaDefinition::builtin();
        assert!(def.tab(TabId::Analysis).unwrap().requires_agent);
        assert!(!def.tab(TabId::Education).unwrap().requires_agent);
    }

    #[test]
    fn field_lookup_by_id() {
        let def = SchemaDefinition::builtin();
        let field = def.worksheet_field("who-affected").unwrap();
        assert_eq!(field.kind, FieldKind::ShortText);
        assert!(field.required);
        assert!(def.worksheet_field("no-such-field").is_none());
    }
}
