//! Statistics module - Seasonal decomposition and component summaries

mod decompose;
mod summary;

pub use decompose::{
    ClassicalDecomposer, Component, DecomposeError, DecomposeSettings, Decomposer,
    Decomposition, SeasonalModel,
};
pub use summary::ComponentSummary;
