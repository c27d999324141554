//! Testing utilities for the SO6 workspace
//!
//! Shared fixtures: sample author inputs, canned raw agent payloads,
//! and markup artifact builders with adjustable structure.

#![allow(missing_docs)]

use serde_json::{json, Value};
use so6_factory::{BlockInput, SubcomponentInput};
use so6_schema::{SchemaRegistry, TabId};

pub fn sample_subcomponent_input() -> SubcomponentInput {
    SubcomponentInput::new(
        "Problem Statement",
        "Define the problem your product solves",
    )
    .with_tab_content(
        TabId::Education,
        json!({ "sections": [{ "title": "Framing the problem", "content": "Start narrow." }] }),
    )
}

pub fn sample_block_input() -> BlockInput {
    BlockInput::new("Mission Discovery", "Find and validate the mission", 1)
        .with_subcomponent(sample_subcomponent_input())
        .with_subcomponent(SubcomponentInput::new("Mission", "State the mission"))
}

/// A well-formed raw agent payload.
pub fn raw_analysis_in_range() -> Value {
    let schema = SchemaRegistry::shared().schema();
    let dims: serde_json::Map<String, Value> = schema
        .scoring_spec
        .default_dimensions
        .iter()
        .map(|key| (key.clone(), json!({ "score": 14, "feedback": "solid" })))
        .collect();
    json!({
        "score": 70,
        "confidence": 0.8,
        "analysis": { "executiveSummary": "A solid start." },
        "detailedScores": dims,
        "recommendations": [
            { "priority": "HIGH", "area": "evidence", "impact": "+10 points" }
        ]
    })
}

/// A raw agent payload that is wrong in every repairable way.
pub fn raw_analysis_garbage() -> Value {
    json!({
        "score": "a lot",
        "confidence": -3,
        "timestamp": "yesterday-ish",
        "detailedScores": { "only": 1, "two": 2 },
        "recommendations": "try harder"
    })
}

/// Render a minimal markup page with the given structure counts.
///
/// A fully conformant page is `markup_artifact(5, 6, 5)`.
pub fn markup_artifact(tabs: usize, fields: usize, dimensions: usize) -> String {
    let schema = SchemaRegistry::shared().schema();
    let mut page = String::from("<main>");
    for tab in schema.tab_spec.iter().take(tabs) {
        page.push_str(&format!("<button data-tab=\"{}\"></button>", tab.id));
        page.push_str(&format!("<div data-section=\"{}\"></div>", tab.id));
    }
    for field in schema.worksheet_field_spec.iter().take(fields) {
        page.push_str(&format!("<input data-field=\"{}\">", field.id));
    }
    for dimension in schema.scoring_spec.default_dimensions.iter().take(dimensions) {
        page.push_str(&format!("<div data-dimension=\"{dimension}\"></div>"));
    }
    page.push_str(&format!(
        "<style>.accent {{ color: {}; }}</style>",
        schema.visual_theme.primary
    ));
    page.push_str("</main>");
    page
}
