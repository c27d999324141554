//! Sealed registry holding the process-wide schema definition.
//!
//! The registry is the only component allowed to hold the contract, and
//! it seals at construction: every public constructor validates the
//! definition and installs it before returning, after which any further
//! write attempt fails synchronously with
//! [`SchemaError::ImmutabilityViolation`]. Consumers receive shared
//! references to the same instance rather than defensive copies.

use crate::definition::{SchemaDefinition, TAB_COUNT, WORKSHEET_FIELD_COUNT};
use crate::error::SchemaError;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashSet;

static SHARED: Lazy<SchemaRegistry> = Lazy::new(|| {
    // An inconsistent built-in definition is a programmer error; the
    // process must fail fast at startup rather than limp along.
    SchemaRegistry::bootstrap().expect("built-in schema definition must be consistent")
});

/// Holder of the one immutable [`SchemaDefinition`].
#[derive(Debug)]
pub struct SchemaRegistry {
    cell: OnceCell<SchemaDefinition>,
}

impl SchemaRegistry {
    /// Validate and install the built-in definition.
    ///
    /// # Errors
    /// `SchemaError::InconsistentDefinition` if the built-in definition
    /// violates its own invariants.
    pub fn bootstrap() -> Result<Self, SchemaError> {
        Self::with_definition(SchemaDefinition::builtin())
    }

    /// Validate and install a caller-supplied definition.
    ///
    /// # Errors
    /// `SchemaError::InconsistentDefinition` if the definition violates
    /// the tab/field/scoring invariants.
    pub fn with_definition(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let registry = Self {
            cell: OnceCell::new(),
        };
        registry.install(definition)?;
        Ok(registry)
    }

    /// The process-wide sealed registry.
    ///
    /// # Panics
    /// On first access, if the built-in definition is internally
    /// inconsistent. This is the deliberate fail-fast path for a
    /// programmer error.
    #[must_use]
    pub fn shared() -> &'static SchemaRegistry {
        &SHARED
    }

    /// Install a definition into an empty registry, sealing it.
    ///
    /// # Errors
    /// - `SchemaError::InconsistentDefinition` if validation fails; the
    ///   registry stays empty.
    /// - `SchemaError::ImmutabilityViolation` if a definition is already
    ///   installed; the installed definition is left unchanged.
    pub fn install(&self, definition: SchemaDefinition) -> Result<(), SchemaError> {
        check_consistency(&definition)?;
        let version = definition.version.clone();
        self.cell
            .set(definition)
            .map_err(|_| SchemaError::ImmutabilityViolation)?;
        tracing::debug!(%version, "schema definition installed and sealed");
        Ok(())
    }

    /// The installed definition.
    ///
    /// Cannot fail for registries obtained from [`Self::bootstrap`],
    /// [`Self::with_definition`] or [`Self::shared`], which all install
    /// before returning.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &SchemaDefinition {
        // Every constructor installs before handing the registry out.
        self.cell
            .get()
            .expect("schema registry is sealed at construction")
    }

    /// Whether a definition has been installed.
    #[inline]
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Verify the structural invariants of a definition.
///
/// # Errors
/// `SchemaError::InconsistentDefinition` naming the first violated
/// invariant.
pub fn check_consistency(definition: &SchemaDefinition) -> Result<(), SchemaError> {
    let inconsistent = |msg: String| Err(SchemaError::InconsistentDefinition(msg));

    if definition.tab_spec.len() != TAB_COUNT {
        return inconsistent(format!(
            "tab count is {}, expected {TAB_COUNT}",
            definition.tab_spec.len()
        ));
    }

    let distinct_ids: HashSet<_> = definition.tab_spec.iter().map(|t| t.id).collect();
    if distinct_ids.len() != definition.tab_spec.len() {
        return inconsistent("duplicate tab ids".to_string());
    }

    for (index, tab) in definition.tab_spec.iter().enumerate() {
        let expected = u8::try_from(index + 1).unwrap_or(u8::MAX);
        if tab.order != expected {
            return inconsistent(format!(
                "tab '{}' has order {}, expected {expected}",
                tab.id, tab.order
            ));
        }
    }

    if definition.worksheet_field_spec.len() != WORKSHEET_FIELD_COUNT {
        return inconsistent(format!(
            "worksheet field count is {}, expected {WORKSHEET_FIELD_COUNT}",
            definition.worksheet_field_spec.len()
        ));
    }

    let distinct_fields: HashSet<_> = definition
        .worksheet_field_spec
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    if distinct_fields.len() != definition.worksheet_field_spec.len() {
        return inconsistent("duplicate worksheet field ids".to_string());
    }

    let scoring = &definition.scoring_spec;
    let dimension_total = scoring.dimension_count * usize::from(scoring.max_per_dimension);
    if dimension_total != usize::from(scoring.total_max) {
        return inconsistent(format!(
            "{} dimensions x {} points != total max {}",
            scoring.dimension_count, scoring.max_per_dimension, scoring.total_max
        ));
    }

    let weight_sum = scoring.dimension_count * usize::from(scoring.weight_per_dimension);
    if weight_sum != 100 {
        return inconsistent(format!("dimension weights sum to {weight_sum}, expected 100"));
    }

    if scoring.default_dimensions.len() != scoring.dimension_count {
        return inconsistent(format!(
            "{} default dimension keys for {} dimensions",
            scoring.default_dimensions.len(),
            scoring.dimension_count
        ));
    }

    Ok(())
}
