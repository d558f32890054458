//! Web layer for the route planner.
//!
//! Provides the JSON route-planning API and serves the map frontend.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
