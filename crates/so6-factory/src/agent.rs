//! Scoring agent capability and wrapping.
//!
//! Agents are pluggable: authors may supply anything implementing
//! [`Scorable`], or nothing at all. Every subcomponent holds a
//! [`ScoringAgent`] wrapper that awaits the capability once, propagates
//! a crashed agent unchanged, and normalizes successful output into the
//! canonical contract. There is exactly one normalization path; the
//! built-in default agent goes through it too.

use crate::error::AgentExecutionFailure;
use crate::normalize::{normalize, AnalysisResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use so6_schema::{SchemaDefinition, SchemaRegistry, ScoringSpec};
use std::collections::HashMap;
use std::sync::Arc;

/// Worksheet responses keyed by field id.
pub type WorksheetResponses = HashMap<String, String>;

/// A pluggable scoring capability.
///
/// Implementations may be arbitrarily slow or remote; the call is a
/// single await point and cancellation propagates from the caller's
/// context. The returned value is untrusted and will be normalized.
#[async_trait]
pub trait Scorable: Send + Sync {
    /// Produce a raw analysis for the given worksheet responses.
    ///
    /// # Errors
    /// `AgentExecutionFailure` if the agent itself crashes; malformed
    /// output is not an error (it is repaired downstream).
    async fn analyze(&self, responses: &WorksheetResponses) -> Result<Value, AgentExecutionFailure>;
}

/// Built-in scoring strategy used when an author supplies no agent.
///
/// Scores proportionally to how many of the expected worksheet fields
/// received a substantive response (more than 10 characters).
#[derive(Debug, Clone)]
pub struct DefaultScorable {
    expected_fields: Vec<String>,
}

/// Minimum response length for a field to count as substantive.
const SUBSTANTIVE_LENGTH: usize = 10;

impl DefaultScorable {
    /// Build against the schema's worksheet field set.
    #[must_use]
    pub fn from_schema(schema: &SchemaDefinition) -> Self {
        Self {
            expected_fields: schema.worksheet_field_ids(),
        }
    }
}

#[async_trait]
impl Scorable for DefaultScorable {
    async fn analyze(&self, responses: &WorksheetResponses) -> Result<Value, AgentExecutionFailure> {
        let qualifying = self
            .expected_fields
            .iter()
            .filter(|id| {
                responses
                    .get(id.as_str())
                    .is_some_and(|r| r.trim().len() > SUBSTANTIVE_LENGTH)
            })
            .count();

        #[allow(clippy::cast_precision_loss)]
        let score = (qualifying as f64 / self.expected_fields.len() as f64 * 100.0).round();

        tracing::debug!(qualifying, total = self.expected_fields.len(), "default agent scored");

        Ok(json!({
            "score": score,
            "confidence": 0.5,
        }))
    }
}

/// The wrapper every subcomponent carries.
///
/// Guarantees that callers always receive a canonical
/// [`AnalysisResult`] or an [`AgentExecutionFailure`] - never raw agent
/// output.
#[derive(Clone)]
pub struct ScoringAgent {
    capability: Arc<dyn Scorable>,
    scoring: ScoringSpec,
}

impl std::fmt::Debug for ScoringAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringAgent")
            .field("scoring", &self.scoring)
            .finish_non_exhaustive()
    }
}

impl ScoringAgent {
    /// Wrap a caller-supplied capability.
    #[inline]
    #[must_use]
    pub fn wrap(capability: Arc<dyn Scorable>, scoring: ScoringSpec) -> Self {
        Self {
            capability,
            scoring,
        }
    }

    /// Wrap the built-in default strategy for the given schema.
    #[must_use]
    pub fn with_default(schema: &SchemaDefinition) -> Self {
        Self::wrap(
            Arc::new(DefaultScorable::from_schema(schema)),
            schema.scoring_spec.clone(),
        )
    }

    /// Run the agent and normalize its output.
    ///
    /// # Errors
    /// `AgentExecutionFailure` only when the underlying capability
    /// crashes; garbage output is repaired, not surfaced. No retries
    /// are performed here.
    pub async fn analyze(
        &self,
        responses: &WorksheetResponses,
    ) -> Result<AnalysisResult, AgentExecutionFailure> {
        let raw = self.capability.analyze(responses).await?;
        Ok(normalize(&raw, &self.scoring))
    }

    /// The wrapped capability, for re-wrapping during cloning.
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Arc<dyn Scorable> {
        Arc::clone(&self.capability)
    }
}

impl Default for ScoringAgent {
    fn default() -> Self {
        Self::with_default(SchemaRegistry::shared().schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedScorable(Value);

    #[async_trait]
    impl Scorable for CannedScorable {
        async fn analyze(&self, _: &WorksheetResponses) -> Result<Value, AgentExecutionFailure> {
            Ok(self.0.clone())
        }
    }

    struct CrashingScorable;

    #[async_trait]
    impl Scorable for CrashingScorable {
        async fn analyze(&self, _: &WorksheetResponses) -> Result<Value, AgentExecutionFailure> {
            Err(AgentExecutionFailure::new("upstream service unavailable"))
        }
    }

    fn schema() -> &'static SchemaDefinition {
        SchemaRegistry::shared().schema()
    }

    #[tokio::test]
    async fn default_agent_scores_zero_for_empty_responses() {
        let agent = ScoringAgent::with_default(schema());
        let result = agent.analyze(&WorksheetResponses::new()).await.unwrap();
        assert_eq!(result.score, 0);
        assert!((result.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn default_agent_scores_proportionally() {
        let mut responses = WorksheetResponses::new();
        responses.insert(
            "who-affected".to_string(),
            "Mid-market sales leaders".to_string(),
        );
        responses.insert(
            "what-problem".to_string(),
            "Forecasts are routinely off by 40 percent".to_string(),
        );
        responses.insert("when-occur".to_string(), "short".to_string());

        let agent = ScoringAgent::with_default(schema());
        let result = agent.analyze(&responses).await.unwrap();
        // 2 of 6 fields are substantive
        assert_eq!(result.score, 33);
    }

    #[tokio::test]
    async fn wrapped_agent_output_is_normalized() {
        let capability = Arc::new(CannedScorable(serde_json::json!({
            "score": 150,
            "confidence": 2,
            "detailedScores": { "a": 1, "b": 2 }
        })));
        let agent = ScoringAgent::wrap(capability, schema().scoring_spec.clone());

        let result = agent.analyze(&WorksheetResponses::new()).await.unwrap();
        assert_eq!(result.score, 50);
        assert!((result.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(result.detailed_scores.len(), 5);
    }

    #[tokio::test]
    async fn agent_crash_propagates_unchanged() {
        let agent = ScoringAgent::wrap(Arc::new(CrashingScorable), schema().scoring_spec.clone());

        let err = agent.analyze(&WorksheetResponses::new()).await.unwrap_err();
        assert_eq!(err.reason, "upstream service unavailable");
    }
}
