//! Error types for the schema crate.

/// Errors raised by the schema registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The hard-coded definition violates its own structural invariants.
    ///
    /// This is a programmer error: the process should refuse to start
    /// rather than run against a broken contract.
    #[error("schema definition is internally inconsistent: {0}")]
    InconsistentDefinition(String),

    /// A write was attempted against a sealed registry.
    ///
    /// Raised synchronously at the write site; the installed definition
    /// is left unchanged.
    #[error("schema registry is sealed; the installed definition cannot be replaced")]
    ImmutabilityViolation,
}
