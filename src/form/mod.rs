//! Identity form feature module.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Form snapshot and field/status types
//! - `intent.rs` - User/system actions
//! - `reducer.rs` - State transitions
//! - `actions.rs` - Intent creators
//! - `selectors.rs` - Derived facts
//! - `validator.rs` - Field rules
//! - `workflow.rs` - Validate → submit → poll

pub mod actions;
mod intent;
mod reducer;
pub mod selectors;
mod state;
pub mod validator;
mod workflow;

pub use intent::FormIntent;
pub use reducer::FormReducer;
pub use state::{
    Field, FormData, FormDataPatch, FormState, FormStatus, UnknownStatus, DEFAULT_FORM_ACTION,
};
pub use workflow::{submit_form, SubmitError, GENERIC_FAILURE_MESSAGE};

/// Store specialised to the identity form.
pub type FormStore = crate::store::Store<FormReducer>;
