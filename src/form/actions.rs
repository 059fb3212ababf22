//! Intent creators for the identity form.

use super::intent::FormIntent;
use super::state::{FormDataPatch, FormState};
use super::validator::{validate_email, validate_fio, validate_phone};

/// Edit only the fields present in the patch.
pub fn edit_form(patch: FormDataPatch) -> FormIntent {
    FormIntent::Edit {
        fio: patch.fio,
        email: patch.email,
        phone: patch.phone,
    }
}

/// Validity flags recomputed from the snapshot's field values.
pub fn validate_form(state: &FormState) -> FormIntent {
    FormIntent::Validate {
        fio_is_valid: validate_fio(&state.fio),
        email_is_valid: validate_email(&state.email),
        phone_is_valid: validate_phone(&state.phone),
    }
}

pub fn set_form_action(action: impl Into<String>) -> FormIntent {
    FormIntent::SetAction {
        action: action.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_form_carries_only_given_fields() {
        let intent = edit_form(FormDataPatch {
            phone: Some("+7(000)111-22-33".into()),
            ..FormDataPatch::default()
        });
        assert_eq!(
            intent,
            FormIntent::Edit {
                fio: None,
                email: None,
                phone: Some("+7(000)111-22-33".into()),
            }
        );
    }

    #[test]
    fn validate_form_checks_every_field() {
        let state = FormState {
            fio: "Марк Твен".into(),
            email: "example@gmail.com".into(),
            phone: "+7(000)111-22-33".into(),
            ..FormState::default()
        };
        assert_eq!(
            validate_form(&state),
            FormIntent::Validate {
                fio_is_valid: false,
                email_is_valid: false,
                phone_is_valid: true,
            }
        );
    }
}
