//! Analysis normalization - raw agent output to the canonical contract.
//!
//! Scoring agents are pluggable and untrusted: they may return missing
//! fields, wrong types, out-of-range numbers or the wrong dimension
//! count. [`normalize`] deterministically repairs any raw value into an
//! [`AnalysisResult`], logging a warning per repair and never failing.
//! Callers downstream can rely on the shape unconditionally.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use so6_schema::ScoringSpec;

/// Recommendation priority, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Must be addressed before the score can meaningfully improve.
    Critical,
    /// Significant improvement opportunity.
    High,
    /// Worth doing, not urgent.
    Medium,
}

impl Priority {
    fn parse(value: &Value) -> Option<Self> {
        match value.as_str()?.to_ascii_uppercase().as_str() {
            "CRITICAL" => Some(Priority::Critical),
            "HIGH" => Some(Priority::High),
            "MEDIUM" => Some(Priority::Medium),
            _ => None,
        }
    }
}

/// Narrative portion of an analysis result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisNarrative {
    /// Executive summary paragraph.
    pub executive_summary: String,
    /// Strengths and weaknesses, keyed by topic.
    pub strengths_and_weaknesses: Map<String, Value>,
    /// Critical gaps identified by the agent.
    pub critical_gaps: Vec<Value>,
    /// Opportunities identified by the agent.
    pub opportunities: Vec<Value>,
}

/// Score for a single dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    /// Points awarded, within `0..=max_score`.
    pub score: u8,
    /// Maximum points for this dimension.
    pub max_score: u8,
    /// `round(score / max_score * 100)`.
    pub percentage: u8,
    /// Dimension weight in percent.
    pub weight: u8,
    /// Per-dimension feedback text.
    pub feedback: String,
}

/// A single improvement recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Priority bucket.
    pub priority: Priority,
    /// Area of the business the recommendation targets.
    pub area: String,
    /// Concrete steps.
    pub action_plan: Vec<Value>,
    /// Expected impact statement.
    pub impact: String,
    /// Expected score improvement in points.
    pub expected_improvement: f64,
    /// Supporting resources.
    pub resources: Vec<Value>,
    /// How to measure success.
    pub success_metrics: Vec<Value>,
    /// Deeper analysis, keyed by topic.
    pub detailed_analysis: Map<String, Value>,
}

/// Canonical analysis result - the contract every display layer can
/// rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall score in `0..=100`.
    pub score: u8,
    /// Agent confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// When the analysis was produced.
    pub timestamp: DateTime<Utc>,
    /// Narrative breakdown.
    pub analysis: AnalysisNarrative,
    /// Exactly one entry per scoring dimension.
    pub detailed_scores: IndexMap<String, DimensionScore>,
    /// At most 5 recommendations.
    pub recommendations: Vec<Recommendation>,
}

/// Maximum number of recommendations kept after normalization.
pub const MAX_RECOMMENDATIONS: usize = 5;

const FALLBACK_SCORE: u8 = 50;
const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_IMPROVEMENT: f64 = 5.0;

/// Repair a raw agent payload into the canonical contract.
///
/// Never fails: every malformed field is replaced by a safe default and
/// logged. Normalizing an already-canonical payload is a no-op.
#[must_use]
pub fn normalize(raw: &Value, scoring: &ScoringSpec) -> AnalysisResult {
    AnalysisResult {
        score: normalize_score(raw.get("score")),
        confidence: normalize_confidence(raw.get("confidence")),
        timestamp: normalize_timestamp(raw.get("timestamp")),
        analysis: normalize_narrative(raw.get("analysis")),
        detailed_scores: normalize_dimensions(raw.get("detailedScores"), scoring),
        recommendations: normalize_recommendations(raw.get("recommendations")),
    }
}

/// Coerce a JSON value to a finite number.
///
/// Accepts numbers and numeric strings; everything else is `None`.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn normalize_score(raw: Option<&Value>) -> u8 {
    match raw.and_then(coerce_number) {
        Some(n) if (0.0..=100.0).contains(&n) => {
            // round() stays within [0, 100] for inputs in range
            n.round() as u8
        }
        other => {
            tracing::warn!(
                raw = ?raw,
                parsed = ?other,
                "score missing or out of range, substituting safe middle default"
            );
            FALLBACK_SCORE
        }
    }
}

fn normalize_confidence(raw: Option<&Value>) -> f64 {
    match raw.and_then(coerce_number) {
        Some(c) if (0.0..=1.0).contains(&c) => c,
        other => {
            tracing::warn!(
                raw = ?raw,
                parsed = ?other,
                "confidence missing or out of range, substituting 0.5"
            );
            FALLBACK_CONFIDENCE
        }
    }
}

fn normalize_timestamp(raw: Option<&Value>) -> DateTime<Utc> {
    match raw.and_then(Value::as_str) {
        Some(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(_) => {
                tracing::warn!(timestamp = text, "unparsable timestamp, substituting now");
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}

fn normalize_narrative(raw: Option<&Value>) -> AnalysisNarrative {
    let Some(analysis) = raw.and_then(Value::as_object) else {
        return AnalysisNarrative::default();
    };

    AnalysisNarrative {
        executive_summary: analysis
            .get("executiveSummary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        strengths_and_weaknesses: analysis
            .get("strengthsAndWeaknesses")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        critical_gaps: analysis
            .get("criticalGaps")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        opportunities: analysis
            .get("opportunities")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    }
}

fn normalize_dimensions(
    raw: Option<&Value>,
    scoring: &ScoringSpec,
) -> IndexMap<String, DimensionScore> {
    if let Some(map) = raw.and_then(Value::as_object) {
        if map.len() == scoring.dimension_count {
            return map
                .iter()
                .map(|(key, entry)| (key.clone(), normalize_dimension_entry(entry, scoring)))
                .collect();
        }
        // A malformed dimension count cannot be safely reshaped; an
        // obviously-neutral default beats guessing a mapping.
        tracing::warn!(
            found = map.len(),
            expected = scoring.dimension_count,
            "dimension count mismatch, substituting neutral default map"
        );
    } else if raw.is_some() {
        tracing::warn!("detailed scores are not a map, substituting neutral default map");
    }

    default_dimensions(scoring)
}

fn normalize_dimension_entry(entry: &Value, scoring: &ScoringSpec) -> DimensionScore {
    let max = scoring.max_per_dimension;
    let raw_score = match entry {
        Value::Object(fields) => fields.get("score").and_then(coerce_number),
        other => coerce_number(other),
    };
    let score = match raw_score {
        Some(n) => n.round().clamp(0.0, f64::from(max)) as u8,
        None => {
            tracing::warn!(entry = ?entry, "dimension score is not a number, substituting midpoint");
            max / 2
        }
    };
    let feedback = entry
        .get("feedback")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    DimensionScore {
        score,
        max_score: max,
        percentage: percentage_of(score, max),
        weight: scoring.weight_per_dimension,
        feedback,
    }
}

fn default_dimensions(scoring: &ScoringSpec) -> IndexMap<String, DimensionScore> {
    let midpoint = scoring.max_per_dimension / 2;
    scoring
        .default_dimensions
        .iter()
        .map(|key| {
            (
                key.clone(),
                DimensionScore {
                    score: midpoint,
                    max_score: scoring.max_per_dimension,
                    percentage: percentage_of(midpoint, scoring.max_per_dimension),
                    weight: scoring.weight_per_dimension,
                    feedback: String::new(),
                },
            )
        })
        .collect()
}

fn percentage_of(score: u8, max: u8) -> u8 {
    if max == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(max) * 100.0).round() as u8
}

fn normalize_recommendations(raw: Option<&Value>) -> Vec<Recommendation> {
    let items = match raw {
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            tracing::warn!(raw = ?other, "recommendations are not a list, substituting empty");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    if items.len() > MAX_RECOMMENDATIONS {
        tracing::warn!(
            found = items.len(),
            kept = MAX_RECOMMENDATIONS,
            "truncating recommendations"
        );
    }

    items
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(normalize_recommendation)
        .collect()
}

fn normalize_recommendation(entry: &Value) -> Recommendation {
    let Some(fields) = entry.as_object() else {
        tracing::warn!(entry = ?entry, "recommendation is not an object, substituting defaults");
        return Recommendation {
            priority: Priority::Medium,
            area: "General".to_string(),
            action_plan: Vec::new(),
            impact: "+5 points".to_string(),
            expected_improvement: FALLBACK_IMPROVEMENT,
            resources: Vec::new(),
            success_metrics: Vec::new(),
            detailed_analysis: Map::new(),
        };
    };

    let list = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    Recommendation {
        priority: fields
            .get("priority")
            .and_then(Priority::parse)
            .unwrap_or(Priority::Medium),
        area: fields
            .get("area")
            .and_then(Value::as_str)
            .unwrap_or("General")
            .to_string(),
        action_plan: list("actionPlan"),
        impact: fields
            .get("impact")
            .and_then(Value::as_str)
            .unwrap_or("+5 points")
            .to_string(),
        expected_improvement: fields
            .get("expectedImprovement")
            .and_then(coerce_number)
            .unwrap_or(FALLBACK_IMPROVEMENT),
        resources: list("resources"),
        success_metrics: list("successMetrics"),
        detailed_analysis: fields
            .get("detailedAnalysis")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use so6_schema::SchemaRegistry;

    fn scoring() -> ScoringSpec {
        SchemaRegistry::shared().schema().scoring_spec.clone()
    }

    #[test]
    fn in_range_payload_passes_through() {
        let raw = json!({
            "score": 72,
            "confidence": 0.8,
            "detailedScores": {
                "clarity": {"score": 15, "feedback": "good"},
                "specificity": {"score": 12},
                "evidence": {"score": 18},
                "alignment": {"score": 14},
                "actionability": {"score": 13}
            }
        });

        let result = normalize(&raw, &scoring());
        assert_eq!(result.score, 72);
        assert!((result.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(result.detailed_scores["clarity"].score, 15);
        assert_eq!(result.detailed_scores["clarity"].percentage, 75);
        assert_eq!(result.detailed_scores["clarity"].feedback, "good");
    }

    #[test]
    fn out_of_range_score_becomes_fifty() {
        for raw_score in [json!(150), json!(-3), json!("garbage"), json!(null), json!([])] {
            let raw = json!({ "score": raw_score.clone() });
            assert_eq!(normalize(&raw, &scoring()).score, 50, "raw: {raw_score}");
        }
    }

    #[test]
    fn numeric_string_score_is_coerced() {
        let raw = json!({ "score": "42" });
        assert_eq!(normalize(&raw, &scoring()).score, 42);
    }

    #[test]
    fn missing_score_becomes_fifty() {
        assert_eq!(normalize(&json!({}), &scoring()).score, 50);
    }

    #[test]
    fn out_of_range_confidence_becomes_half() {
        for raw_confidence in [json!(2.0), json!(-0.1), json!("high")] {
            let raw = json!({ "confidence": raw_confidence });
            let result = normalize(&raw, &scoring());
            assert!((result.confidence - 0.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn supplied_timestamp_is_kept() {
        let raw = json!({ "timestamp": "2026-01-15T10:30:00Z" });
        let result = normalize(&raw, &scoring());
        assert_eq!(result.timestamp.to_rfc3339(), "2026-01-15T10:30:00+00:00");
    }

    #[test]
    fn unparsable_timestamp_is_replaced() {
        let before = Utc::now();
        let raw = json!({ "timestamp": "last tuesday" });
        let result = normalize(&raw, &scoring());
        assert!(result.timestamp >= before);
    }

    #[test]
    fn wrong_dimension_count_is_discarded_wholesale() {
        let raw = json!({
            "detailedScores": { "a": {"score": 19}, "b": {"score": 20} }
        });
        let result = normalize(&raw, &scoring());
        let keys: Vec<&String> = result.detailed_scores.keys().collect();
        assert_eq!(keys, ["clarity", "specificity", "evidence", "alignment", "actionability"]);
        for dim in result.detailed_scores.values() {
            assert_eq!(dim.score, 10);
            assert_eq!(dim.percentage, 50);
        }
    }

    #[test]
    fn dimension_scores_are_clamped() {
        let raw = json!({
            "detailedScores": {
                "clarity": {"score": 35},
                "specificity": {"score": -4},
                "evidence": 7,
                "alignment": {"score": "12"},
                "actionability": {"score": null}
            }
        });
        let result = normalize(&raw, &scoring());
        assert_eq!(result.detailed_scores["clarity"].score, 20);
        assert_eq!(result.detailed_scores["specificity"].score, 0);
        assert_eq!(result.detailed_scores["evidence"].score, 7);
        assert_eq!(result.detailed_scores["alignment"].score, 12);
        assert_eq!(result.detailed_scores["actionability"].score, 10);
        assert_eq!(result.detailed_scores["evidence"].percentage, 35);
    }

    #[test]
    fn recommendations_truncate_to_five_and_default_priority() {
        let entries: Vec<Value> = (0..8).map(|i| json!({ "area": format!("area-{i}") })).collect();
        let raw = json!({ "recommendations": entries });

        let result = normalize(&raw, &scoring());
        assert_eq!(result.recommendations.len(), 5);
        for (i, rec) in result.recommendations.iter().enumerate() {
            assert_eq!(rec.priority, Priority::Medium);
            assert_eq!(rec.area, format!("area-{i}"));
            assert_eq!(rec.impact, "+5 points");
            assert!((rec.expected_improvement - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn non_list_recommendations_become_empty() {
        let raw = json!({ "recommendations": "do better" });
        assert!(normalize(&raw, &scoring()).recommendations.is_empty());
    }

    #[test]
    fn recommendation_priority_is_parsed_case_insensitively() {
        let raw = json!({
            "recommendations": [
                { "priority": "critical" },
                { "priority": "HIGH" },
                { "priority": "urgent" }
            ]
        });
        let result = normalize(&raw, &scoring());
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
        assert_eq!(result.recommendations[1].priority, Priority::High);
        assert_eq!(result.recommendations[2].priority, Priority::Medium);
    }

    #[test]
    fn narrative_defaults_to_empty() {
        let result = normalize(&json!({}), &scoring());
        assert_eq!(result.analysis, AnalysisNarrative::default());
    }

    #[test]
    fn narrative_fields_pass_through() {
        let raw = json!({
            "analysis": {
                "executiveSummary": "solid start",
                "strengthsAndWeaknesses": { "strengths": ["clear problem"] },
                "criticalGaps": ["no evidence"],
                "opportunities": ["interview more users"]
            }
        });
        let result = normalize(&raw, &scoring());
        assert_eq!(result.analysis.executive_summary, "solid start");
        assert_eq!(result.analysis.critical_gaps, vec![json!("no evidence")]);
        assert_eq!(result.analysis.opportunities.len(), 1);
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = json!({
            "score": 310,
            "confidence": "0.9",
            "analysis": { "executiveSummary": "ok" },
            "detailedScores": { "x": 1, "y": 2 },
            "recommendations": [{ "priority": "HIGH", "area": "pricing" }, "fix it"]
        });

        let once = normalize(&raw, &scoring());
        let reserialized = serde_json::to_value(&once).unwrap();
        let twice = normalize(&reserialized, &scoring());
        assert_eq!(once, twice);
    }

    mod laws {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_always_lands_in_range(value in proptest::num::f64::ANY) {
                let raw = json!({ "score": value });
                let result = normalize(&raw, &scoring());
                prop_assert!(result.score <= 100);
                if !(0.0..=100.0).contains(&value) {
                    prop_assert_eq!(result.score, 50);
                }
            }

            #[test]
            fn string_scores_land_in_range(text in ".{0,24}") {
                let raw = json!({ "score": text });
                let result = normalize(&raw, &scoring());
                prop_assert!(result.score <= 100);
            }

            #[test]
            fn confidence_always_lands_in_range(value in proptest::num::f64::ANY) {
                let raw = json!({ "confidence": value });
                let result = normalize(&raw, &scoring());
                prop_assert!((0.0..=1.0).contains(&result.confidence));
            }

            #[test]
            fn dimension_percentage_tracks_score(score in -50i32..80) {
                let raw = json!({
                    "detailedScores": {
                        "clarity": {"score": score},
                        "specificity": {"score": 1},
                        "evidence": {"score": 2},
                        "alignment": {"score": 3},
                        "actionability": {"score": 4}
                    }
                });
                let result = normalize(&raw, &scoring());
                let dim = &result.detailed_scores["clarity"];
                prop_assert!(dim.score <= 20);
                prop_assert_eq!(
                    i32::from(dim.percentage),
                    (f64::from(dim.score) / 20.0 * 100.0).round() as i32
                );
            }

            #[test]
            fn normalization_is_idempotent_for_numeric_payloads(
                score in proptest::num::f64::ANY,
                confidence in proptest::num::f64::ANY,
                extra_dims in 0usize..8,
            ) {
                let dims: Map<String, Value> = (0..extra_dims)
                    .map(|i| (format!("dim-{i}"), json!({ "score": i })))
                    .collect();
                let raw = json!({
                    "score": score,
                    "confidence": confidence,
                    "detailedScores": dims
                });

                let once = normalize(&raw, &scoring());
                let twice = normalize(&serde_json::to_value(&once).unwrap(), &scoring());
                prop_assert_eq!(once, twice);
            }
        }
    }
}
