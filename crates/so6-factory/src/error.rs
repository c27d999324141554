//! Error types for component construction and agent execution.

/// Errors raised while constructing blocks and subcomponents.
///
/// All variants are fatal to the single construction call: no partial
/// object is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// Author input lacks a required field.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A constructed object would violate the tab/field/dimension
    /// invariants. Unreachable when construction goes through the
    /// factory; guards code paths that bypass it.
    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// A value offered for cloning matches neither the subcomponent nor
    /// the block shape.
    #[error("unknown component type: value has neither tabs nor subcomponents")]
    UnknownComponentType,
}

/// The wrapped scoring agent's callable itself failed.
///
/// Distinct from "agent returned garbage data", which is repaired in
/// place by normalization. Propagated unchanged to the caller of
/// `analyze`; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
#[error("agent execution failed: {reason}")]
pub struct AgentExecutionFailure {
    /// Human-readable failure description.
    pub reason: String,
}

impl AgentExecutionFailure {
    /// Create a failure with the given reason.
    #[inline]
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
