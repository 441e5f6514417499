//! Application state core
//!
//! - Actions: what happened
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State
//! - Effects: what must be written to storage after a transition
//!
//! The store (see `crate::store`) is the only place that performs I/O; it
//! builds actions, runs the reducer and then applies the resulting effect.

pub mod actions;
pub mod effects;
pub mod reducer;
pub mod state;

pub use actions::Action;
pub use effects::{persist_effect, PersistEffect};
pub use reducer::reduce;
pub use state::AppState;
