//! Pure state transitions.
//!
//! Transitions map `(state, action)` to a new state without touching their
//! inputs. Parts of the state that an action does not change are shared
//! between the old and new values.

mod transition;

pub use transition::{reduce, reduce_checked};
