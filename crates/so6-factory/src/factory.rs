//! Component factory - partial author input to conformant artifacts.
//!
//! The factory is the only construction path: it applies the schema to
//! whatever the author supplied, synthesizes defaults for the rest, and
//! refuses to return anything that fails the structural invariants.

use crate::agent::ScoringAgent;
use crate::component::{Block, Component, ScoreCalculation, Subcomponent, Tab, WorksheetField};
use crate::error::FactoryError;
use crate::input::{BlockInput, ContentOverrides, SubcomponentInput};
use serde_json::{json, Value};
use so6_schema::{SchemaDefinition, SchemaRegistry, TabId};

/// Builds schema-conformant blocks and subcomponents.
///
/// Pure over its inputs plus the read-only schema; safe to share and
/// call concurrently.
#[derive(Debug, Clone, Copy)]
pub struct ComponentFactory<'s> {
    schema: &'s SchemaDefinition,
}

impl<'s> ComponentFactory<'s> {
    /// Create a factory over a sealed registry.
    #[inline]
    #[must_use]
    pub fn new(registry: &'s SchemaRegistry) -> Self {
        Self {
            schema: registry.schema(),
        }
    }

    /// Create a factory over an explicit definition.
    #[inline]
    #[must_use]
    pub fn with_schema(schema: &'s SchemaDefinition) -> Self {
        Self { schema }
    }

    /// The schema this factory builds against.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &SchemaDefinition {
        self.schema
    }

    /// Build a subcomponent from partial author input.
    ///
    /// Tabs and worksheet fields are always the schema's; author
    /// content fills the slots, defaults fill the rest. The agent is
    /// always wrapped, even when absent.
    ///
    /// # Errors
    /// - `FactoryError::MissingRequiredField` for an empty title or
    ///   description.
    /// - `FactoryError::StructuralInvariant` if the constructed object
    ///   would deviate from the schema (unreachable through this path).
    pub fn create_subcomponent(
        &self,
        mut input: SubcomponentInput,
    ) -> Result<Subcomponent, FactoryError> {
        let title = require_field(&input.title, "title")?;
        let description = require_field(&input.description, "description")?;
        let id = input.id.take().unwrap_or_else(|| slugify(&title));

        let tabs: Vec<Tab> = self
            .schema
            .tab_spec
            .iter()
            .map(|spec| {
                let content = input
                    .tab_content
                    .remove(&spec.id)
                    .unwrap_or_else(|| default_tab_content(spec.id, &title));
                Tab {
                    id: spec.id,
                    label: spec.label.clone(),
                    order: spec.order,
                    requires_agent: spec.requires_agent,
                    content,
                }
            })
            .collect();

        let worksheet_fields: Vec<WorksheetField> = self
            .schema
            .worksheet_field_spec
            .iter()
            .map(|spec| WorksheetField {
                id: spec.id.clone(),
                kind: spec.kind,
                required: spec.required,
                label: input
                    .worksheet_labels
                    .remove(&spec.id)
                    .unwrap_or_else(|| spec.label.clone()),
                placeholder: input
                    .worksheet_placeholders
                    .remove(&spec.id)
                    .unwrap_or_else(|| spec.placeholder.clone()),
            })
            .collect();

        let agent = match input.agent.take() {
            Some(capability) => {
                ScoringAgent::wrap(capability, self.schema.scoring_spec.clone())
            }
            None => ScoringAgent::with_default(self.schema),
        };

        let subcomponent = Subcomponent {
            id,
            title,
            description,
            tabs,
            worksheet_fields,
            agent,
            resources: input.resources,
            theme: self.schema.visual_theme.clone(),
        };

        subcomponent.ensure_conformant(self.schema)?;
        tracing::debug!(id = %subcomponent.id, "subcomponent constructed");
        Ok(subcomponent)
    }

    /// Build a block from partial author input.
    ///
    /// The schema block layout is attached verbatim and the score
    /// policy is always `average`; neither is author-configurable.
    ///
    /// # Errors
    /// - `FactoryError::MissingRequiredField` for an empty title or
    ///   description.
    /// - `FactoryError::StructuralInvariant` for a block number outside
    ///   1..=16, or any failure constructing a child.
    pub fn create_block(&self, mut input: BlockInput) -> Result<Block, FactoryError> {
        let title = require_field(&input.title, "title")?;
        let description = require_field(&input.description, "description")?;
        let id = input.id.take().unwrap_or_else(|| slugify(&title));

        let subcomponents = input
            .subcomponents
            .into_iter()
            .map(|child| self.create_subcomponent(child))
            .collect::<Result<Vec<_>, _>>()?;

        let block = Block {
            id,
            title,
            description,
            number: input.number,
            structure: self.schema.block_layout.clone(),
            subcomponents,
            score_calculation: ScoreCalculation::Average,
        };

        block.ensure_conformant(self.schema)?;
        tracing::debug!(id = %block.id, number = block.number, "block constructed");
        Ok(block)
    }

    /// Re-run construction from an existing component merged with
    /// overrides.
    ///
    /// # Errors
    /// Same as the underlying `create_*` call for the component's kind.
    pub fn clone_with_content(
        &self,
        original: &Component,
        overrides: ContentOverrides,
    ) -> Result<Component, FactoryError> {
        match original {
            Component::Subcomponent(subcomponent) => {
                let input = merge_subcomponent(subcomponent_input_from(subcomponent), overrides);
                Ok(Component::Subcomponent(self.create_subcomponent(input)?))
            }
            Component::Block(block) => {
                let input = merge_block(block_input_from(block), overrides);
                Ok(Component::Block(self.create_block(input)?))
            }
        }
    }
}

fn require_field(value: &str, field: &'static str) -> Result<String, FactoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FactoryError::MissingRequiredField { field });
    }
    Ok(trimmed.to_string())
}

/// Derive an id from a title: lowercase, whitespace runs to hyphens,
/// everything but `[a-z0-9-]` stripped.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

fn default_tab_content(tab: TabId, title: &str) -> Value {
    let topic = title.to_lowercase();
    match tab {
        TabId::Education => json!({
            "sections": [
                {
                    "title": format!("What is {title}?"),
                    "content": format!(
                        "An overview of {topic} and the role it plays in your go-to-market motion."
                    )
                },
                {
                    "title": "Why it matters",
                    "content": format!(
                        "Teams that get {topic} right move faster through every later stage."
                    )
                },
                {
                    "title": "Common pitfalls",
                    "content": format!("Mistakes teams make when working through {topic}.")
                }
            ]
        }),
        TabId::Workspace => json!({
            "instructions": format!(
                "Complete the worksheet below to assess your {topic}. Be specific; the analysis is only as good as your answers."
            )
        }),
        TabId::Analysis => json!({
            "placeholder": "Your analysis will appear here once the worksheet has been scored."
        }),
        TabId::Resources => json!({
            "templates": [
                {
                    "name": format!("{title} Template"),
                    "description": "A fill-in-the-blanks starting point."
                },
                {
                    "name": format!("{title} Checklist"),
                    "description": "Items to verify before moving on."
                },
                {
                    "name": format!("{title} Example"),
                    "description": "A worked example from a comparable company."
                }
            ]
        }),
        TabId::History => json!({ "entries": [] }),
    }
}

fn subcomponent_input_from(subcomponent: &Subcomponent) -> SubcomponentInput {
    let mut input = SubcomponentInput::new(&subcomponent.title, &subcomponent.description)
        .with_id(&subcomponent.id)
        .with_agent(subcomponent.agent.capability());
    for tab in &subcomponent.tabs {
        input.tab_content.insert(tab.id, tab.content.clone());
    }
    for field in &subcomponent.worksheet_fields {
        input
            .worksheet_labels
            .insert(field.id.clone(), field.label.clone());
        input
            .worksheet_placeholders
            .insert(field.id.clone(), field.placeholder.clone());
    }
    input.resources = subcomponent.resources.clone();
    input
}

fn block_input_from(block: &Block) -> BlockInput {
    let mut input =
        BlockInput::new(&block.title, &block.description, block.number).with_id(&block.id);
    input.subcomponents = block
        .subcomponents
        .iter()
        .map(subcomponent_input_from)
        .collect();
    input
}

fn merge_subcomponent(
    mut input: SubcomponentInput,
    overrides: ContentOverrides,
) -> SubcomponentInput {
    if let Some(title) = overrides.title {
        input.title = title;
        // A retitled clone gets a fresh slug unless pinned explicitly.
        input.id = overrides.id.clone();
    }
    if let Some(description) = overrides.description {
        input.description = description;
    }
    if let Some(id) = overrides.id {
        input.id = Some(id);
    }
    for (tab, content) in overrides.tab_content {
        input.tab_content.insert(tab, content);
    }
    for (field, label) in overrides.worksheet_labels {
        input.worksheet_labels.insert(field, label);
    }
    for (field, placeholder) in overrides.worksheet_placeholders {
        input.worksheet_placeholders.insert(field, placeholder);
    }
    if let Some(resources) = overrides.resources {
        input.resources = resources;
    }
    if let Some(agent) = overrides.agent {
        input.agent = Some(agent);
    }
    input
}

fn merge_block(mut input: BlockInput, overrides: ContentOverrides) -> BlockInput {
    if let Some(title) = overrides.title {
        input.title = title;
        input.id = overrides.id.clone();
    }
    if let Some(description) = overrides.description {
        input.description = description;
    }
    if let Some(id) = overrides.id {
        input.id = Some(id);
    }
    if let Some(number) = overrides.number {
        input.number = number;
    }
    input
}
