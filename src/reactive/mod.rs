//! Reactive core: observable cells, scopes and the recompose scheduler.
//!
//! Everything lives in a [`Runtime`]. A scope runs a view function; cells it
//! reads become its dependencies; writing one of those cells marks the scope
//! dirty; [`Runtime::recompose`] re-runs dirty scopes shallowest first.

pub mod cell;
pub mod runtime;
pub mod scope;

pub use cell::State;
pub use runtime::{RecomposeStats, Runtime, Validator, ViewFn};
pub use scope::{CallSite, CellId, Key, Presence, ScopeId};
