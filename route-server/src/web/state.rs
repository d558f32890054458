//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;
use crate::stations::StationSource;

/// Shared application state.
///
/// Holds only read-only collaborators; every request builds its own graph.
#[derive(Clone)]
pub struct AppState {
    /// Station data, read afresh on every request
    pub source: Arc<dyn StationSource>,

    /// Graph construction parameters
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: impl StationSource + 'static, config: PlannerConfig) -> Self {
        Self::from_shared(Arc::new(source), config)
    }

    /// Create a new app state around an already shared source.
    pub fn from_shared(source: Arc<dyn StationSource>, config: PlannerConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }
}
