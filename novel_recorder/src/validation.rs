//! Field checks shared by the request forms.

use crate::error::{RecorderError, RecorderResult};

/// Longest accepted name or title, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Reject blank or over-long single-line fields.
pub(crate) fn check_name(field: &'static str, value: &str) -> RecorderResult<()> {
    if value.trim().is_empty() {
        return Err(RecorderError::validation(field, "This field may not be blank."));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(RecorderError::validation(
            field,
            format!("Ensure this field has no more than {MAX_NAME_LEN} characters."),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("name", "Dune").is_ok());
        assert!(check_name("name", "   ").is_err());
        assert!(check_name("name", &"x".repeat(MAX_NAME_LEN)).is_ok());

        let err = check_name("title", &"x".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert!(matches!(err, RecorderError::Validation { field: "title", .. }));
    }
}
