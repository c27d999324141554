//! Author-supplied partial content, before the factory fills it in.
//!
//! Authors write titles, descriptions and whatever per-tab content they
//! have; everything structural comes from the schema. Builder methods
//! follow the usual `with_*` shape.

use crate::agent::Scorable;
use serde_json::Value;
use so6_schema::TabId;
use std::collections::HashMap;
use std::sync::Arc;

/// Partial author input for one subcomponent.
#[derive(Default, Clone)]
pub struct SubcomponentInput {
    /// Display title (required, non-empty).
    pub title: String,
    /// Display description (required, non-empty).
    pub description: String,
    /// Explicit id; derived from the title when absent.
    pub id: Option<String>,
    /// Author content per tab; missing tabs get synthesized defaults.
    pub tab_content: HashMap<TabId, Value>,
    /// Label overrides keyed by worksheet field id.
    pub worksheet_labels: HashMap<String, String>,
    /// Placeholder overrides keyed by worksheet field id.
    pub worksheet_placeholders: HashMap<String, String>,
    /// Scoring capability; the default strategy is used when absent.
    pub agent: Option<Arc<dyn Scorable>>,
    /// Resource records; unconstrained shape.
    pub resources: Vec<Value>,
}

impl std::fmt::Debug for SubcomponentInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubcomponentInput")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("id", &self.id)
            .field("tab_content", &self.tab_content)
            .field("has_agent", &self.agent.is_some())
            .finish_non_exhaustive()
    }
}

impl SubcomponentInput {
    /// Create input with the two required fields.
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// With an explicit id.
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With author content for one tab.
    #[inline]
    #[must_use]
    pub fn with_tab_content(mut self, tab: TabId, content: Value) -> Self {
        self.tab_content.insert(tab, content);
        self
    }

    /// With a label override for one worksheet field.
    #[inline]
    #[must_use]
    pub fn with_worksheet_label(
        mut self,
        field_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.worksheet_labels.insert(field_id.into(), label.into());
        self
    }

    /// With a placeholder override for one worksheet field.
    #[inline]
    #[must_use]
    pub fn with_worksheet_placeholder(
        mut self,
        field_id: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        self.worksheet_placeholders
            .insert(field_id.into(), placeholder.into());
        self
    }

    /// With a scoring capability.
    #[inline]
    #[must_use]
    pub fn with_agent(mut self, agent: Arc<dyn Scorable>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// With one resource record appended.
    #[inline]
    #[must_use]
    pub fn with_resource(mut self, resource: Value) -> Self {
        self.resources.push(resource);
        self
    }
}

/// Partial author input for one block.
#[derive(Default, Clone)]
pub struct BlockInput {
    /// Display title (required, non-empty).
    pub title: String,
    /// Display description (required, non-empty).
    pub description: String,
    /// Position in the fixed 16-block catalog.
    pub number: u8,
    /// Explicit id; derived from the title when absent.
    pub id: Option<String>,
    /// Raw partial specs for the child subcomponents.
    pub subcomponents: Vec<SubcomponentInput>,
}

impl std::fmt::Debug for BlockInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockInput")
            .field("title", &self.title)
            .field("number", &self.number)
            .field("subcomponents", &self.subcomponents.len())
            .finish_non_exhaustive()
    }
}

impl BlockInput {
    /// Create input with the required fields.
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, number: u8) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            number,
            ..Self::default()
        }
    }

    /// With an explicit id.
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With one child subcomponent spec appended.
    #[inline]
    #[must_use]
    pub fn with_subcomponent(mut self, input: SubcomponentInput) -> Self {
        self.subcomponents.push(input);
        self
    }
}

/// Field overrides applied when cloning an existing component.
///
/// Unset fields keep the original's values.
#[derive(Default)]
pub struct ContentOverrides {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement id.
    pub id: Option<String>,
    /// Per-tab content replacements, merged over the original's.
    pub tab_content: HashMap<TabId, Value>,
    /// Worksheet label replacements, merged over the original's.
    pub worksheet_labels: HashMap<String, String>,
    /// Worksheet placeholder replacements, merged over the original's.
    pub worksheet_placeholders: HashMap<String, String>,
    /// Replacement resources (whole-list replacement).
    pub resources: Option<Vec<Value>>,
    /// Replacement scoring capability.
    pub agent: Option<Arc<dyn Scorable>>,
    /// Replacement block number.
    pub number: Option<u8>,
}

impl std::fmt::Debug for ContentOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentOverrides")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("id", &self.id)
            .field("number", &self.number)
            .finish_non_exhaustive()
    }
}

impl ContentOverrides {
    /// Empty overrides: a clone keeps everything.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a replacement title.
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With a replacement description.
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With a replacement id.
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With replacement content for one tab.
    #[inline]
    #[must_use]
    pub fn with_tab_content(mut self, tab: TabId, content: Value) -> Self {
        self.tab_content.insert(tab, content);
        self
    }

    /// With a replacement scoring capability.
    #[inline]
    #[must_use]
    pub fn with_agent(mut self, agent: Arc<dyn Scorable>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// With a replacement block number.
    #[inline]
    #[must_use]
    pub fn with_number(mut self, number: u8) -> Self {
        self.number = Some(number);
        self
    }
}
