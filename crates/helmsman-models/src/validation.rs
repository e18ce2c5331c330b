//! Shared field validators.

use validator::ValidationError;

const MAX_IDENTIFIER_LEN: usize = 64;

/// Machine names for roles, resources, actions and UI components: lowercase
/// ASCII, digits, `_` and `.`, starting with a letter.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid = starts_with_letter
        && value.len() <= MAX_IDENTIFIER_LEN
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("identifier");
        err.message = Some(
            "must start with a lowercase letter and contain only a-z, 0-9, '_' or '.'".into(),
        );
        Err(err)
    }
}

/// A non-empty action vocabulary without duplicates.
pub fn validate_action_list(actions: &[String]) -> Result<(), ValidationError> {
    if actions.is_empty() {
        let mut err = ValidationError::new("actions");
        err.message = Some("at least one action is required".into());
        return Err(err);
    }

    for (i, action) in actions.iter().enumerate() {
        validate_identifier(action)?;
        if actions[..i].contains(action) {
            let mut err = ValidationError::new("actions");
            err.message = Some(format!("duplicate action `{}`", action).into());
            return Err(err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert!(validate_identifier("coordinateur").is_ok());
        assert!(validate_identifier("agents.export_button").is_ok());
        assert!(validate_identifier("level_2").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("Admin").is_err());
        assert!(validate_identifier("2fa").is_err());
        assert!(validate_identifier("has space").is_err());
        assert!(validate_identifier(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_action_list() {
        let ok = vec!["view".to_string(), "export".to_string()];
        assert!(validate_action_list(&ok).is_ok());

        assert!(validate_action_list(&[]).is_err());

        let dup = vec!["view".to_string(), "view".to_string()];
        assert!(validate_action_list(&dup).is_err());

        let bad = vec!["View".to_string()];
        assert!(validate_action_list(&bad).is_err());
    }
}
