//! Aggregation endpoint layer: one route per provider adapter, plus
//! liveness and credential diagnostics.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{AppState, build_state, init_tracing};
