//! Model-View-Intent primitives.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Subscribers (view bindings)
//!    ↑                                 │
//!    └─────────────────────────────────┘
//! ```
//!
//! A [`crate::store::Store`] is generic over a [`Reducer`]; the form
//! controller is its only instantiation outside tests.

/// Something that can be fed to a reducer: a field edit, a validation
/// result, a server answer. Each one is consumed exactly once.
pub trait Intent: std::fmt::Debug + Send + 'static {}

/// A snapshot held by a store.
///
/// Snapshots are replaced wholesale and shared across tasks; `PartialEq`
/// lets bindings diff consecutive snapshots.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}

/// The single place where state changes.
pub trait Reducer: 'static {
    type State: UiState;
    type Intent: Intent;

    /// `(State, Intent) -> State` with no side effects.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
