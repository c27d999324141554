//! SO6 Schema - the locked structural contract
//!
//! Holds the immutable definition every block and subcomponent must
//! conform to:
//! - 5 tabs (education, workspace, analysis, resources, history)
//! - 6 worksheet fields with schema-fixed kinds
//! - 5 scoring dimensions of 20 points each
//! - block layout, visual theme and interaction patterns
//!
//! The registry seals at construction; structural drift cannot be
//! introduced accidentally anywhere in the process.
//!
//! # Example
//!
//! ```rust
//! use so6_schema::SchemaRegistry;
//!
//! let schema = SchemaRegistry::shared().schema();
//! assert_eq!(schema.tab_spec.len(), 5);
//! assert_eq!(schema.worksheet_field_spec.len(), 6);
//! ```

pub mod definition;
pub mod error;
pub mod registry;

pub use definition::{
    BlockLayout, FieldKind, GridSpec, HeaderSpec, InteractionPatterns, SchemaDefinition,
    ScoreDisplaySpec, ScoringSpec, TabId, TabSpec, VisualTheme, WorksheetFieldSpec, TAB_COUNT,
    WORKSHEET_FIELD_COUNT,
};
pub use error::SchemaError;
pub use registry::{check_consistency, SchemaRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
