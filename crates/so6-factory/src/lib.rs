//! SO6 Factory - schema-conformant component construction
//!
//! Turns partial author content into fully-formed blocks and
//! subcomponents, and wraps pluggable scoring agents so that their
//! output always satisfies the canonical analysis contract:
//! - `ComponentFactory` applies the locked schema to author input
//! - `normalize` repairs arbitrary agent payloads, never failing
//! - `Scorable` is the capability seam; `DefaultScorable` fills in when
//!   an author supplies no agent
//!
//! # Example
//!
//! ```rust
//! use so6_factory::{ComponentFactory, SubcomponentInput};
//! use so6_schema::SchemaRegistry;
//!
//! # fn example() -> Result<(), so6_factory::FactoryError> {
//! let factory = ComponentFactory::new(SchemaRegistry::shared());
//! let subcomponent =
//!     factory.create_subcomponent(SubcomponentInput::new("Problem Statement", "Define it"))?;
//!
//! assert_eq!(subcomponent.tabs.len(), 5);
//! assert_eq!(subcomponent.worksheet_fields.len(), 6);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod component;
pub mod error;
pub mod factory;
pub mod input;
pub mod normalize;

pub use agent::{DefaultScorable, Scorable, ScoringAgent, WorksheetResponses};
pub use component::{
    Block, Component, ComponentKind, ScoreCalculation, Subcomponent, Tab, WorksheetField,
};
pub use error::{AgentExecutionFailure, FactoryError};
pub use factory::{slugify, ComponentFactory};
pub use input::{BlockInput, ContentOverrides, SubcomponentInput};
pub use normalize::{
    normalize, AnalysisNarrative, AnalysisResult, DimensionScore, Priority, Recommendation,
    MAX_RECOMMENDATIONS,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for constructing and scoring components
    pub use crate::{
        AnalysisResult, Block, BlockInput, Component, ComponentFactory, ContentOverrides,
        Scorable, ScoringAgent, Subcomponent, SubcomponentInput, WorksheetResponses,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
