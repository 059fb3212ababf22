//! Derived facts about a form snapshot.

use super::state::{Field, FormState};

/// All three fields passed their last validation.
pub fn is_form_valid(state: &FormState) -> bool {
    state.fio_is_valid && state.email_is_valid && state.phone_is_valid
}

/// Fields whose last validation failed, in `fio, email, phone` order.
pub fn invalid_fields(state: &FormState) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| !state.is_valid(*field))
        .collect()
}

pub fn invalid_field_names(state: &FormState) -> Vec<&'static str> {
    invalid_fields(state).into_iter().map(Field::name).collect()
}
