//! End-to-end construction and scoring scenarios.

use async_trait::async_trait;
use serde_json::{json, Value};
use so6_factory::{
    AgentExecutionFailure, Component, ComponentFactory, ComponentKind, FactoryError, Scorable,
    SubcomponentInput, WorksheetResponses,
};
use so6_schema::SchemaRegistry;
use std::sync::Arc;

struct CannedScorable(Value);

#[async_trait]
impl Scorable for CannedScorable {
    async fn analyze(&self, _: &WorksheetResponses) -> Result<Value, AgentExecutionFailure> {
        Ok(self.0.clone())
    }
}

fn factory() -> ComponentFactory<'static> {
    ComponentFactory::new(SchemaRegistry::shared())
}

#[tokio::test]
async fn bare_input_builds_a_scoreable_subcomponent() {
    let subcomponent = factory()
        .create_subcomponent(SubcomponentInput::new("Problem Statement", "desc"))
        .unwrap();

    assert_eq!(subcomponent.tabs.len(), 5);
    assert_eq!(subcomponent.worksheet_fields.len(), 6);

    // No agent supplied: the default strategy scores 0 of 6 empty responses.
    let result = subcomponent
        .agent
        .analyze(&WorksheetResponses::new())
        .await
        .unwrap();
    assert_eq!(result.score, 0);
}

#[tokio::test]
async fn hostile_agent_output_is_repaired_before_callers_see_it() {
    let agent = Arc::new(CannedScorable(json!({
        "score": 150,
        "confidence": 2,
        "detailedScores": { "a": 1, "b": 2 }
    })));

    let subcomponent = factory()
        .create_subcomponent(SubcomponentInput::new("X", "Y").with_agent(agent))
        .unwrap();

    let result = subcomponent
        .agent
        .analyze(&WorksheetResponses::new())
        .await
        .unwrap();

    assert_eq!(result.score, 50);
    assert!((result.confidence - 0.5).abs() < f64::EPSILON);
    assert_eq!(result.detailed_scores.len(), 5);
    for dim in result.detailed_scores.values() {
        assert_eq!(dim.score, 10);
        assert_eq!(dim.max_score, 20);
        assert_eq!(dim.percentage, 50);
    }
}

#[test]
fn serialized_subcomponent_classifies_back_to_its_kind() {
    let subcomponent = factory()
        .create_subcomponent(SubcomponentInput::new("Problem Statement", "desc"))
        .unwrap();

    let value = serde_json::to_value(&subcomponent).unwrap();
    assert_eq!(
        Component::kind_of(&value).unwrap(),
        ComponentKind::Subcomponent
    );
}

#[test]
fn tampered_serialized_subcomponent_fails_the_conformance_guard() {
    let subcomponent = factory()
        .create_subcomponent(SubcomponentInput::new("Problem Statement", "desc"))
        .unwrap();

    let mut value = serde_json::to_value(&subcomponent).unwrap();
    value["tabs"].as_array_mut().unwrap().pop();

    let rehydrated: so6_factory::Subcomponent = serde_json::from_value(value).unwrap();
    let result = rehydrated.ensure_conformant(SchemaRegistry::shared().schema());
    assert!(matches!(
        result,
        Err(FactoryError::StructuralInvariant(msg)) if msg.contains("4 tabs")
    ));
}
