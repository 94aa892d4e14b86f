// Small helpers shared by entity constructors

use super::errors::{DomainError, DomainResult};

/// Trims `value` and checks it is non-empty and at most `max` characters
pub fn required_text(field: &str, value: &str, max: usize) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(field, "This field may not be blank."));
    }
    check_max(field, value, max)?;
    Ok(value.to_string())
}

/// Like [`required_text`] but blank input becomes `None`
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> DomainResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            check_max(field, value, max)?;
            Ok(Some(value.to_string()))
        }
    }
}

fn check_max(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  Plumber ", 10).unwrap(), "Plumber");
    }

    #[test]
    fn required_text_rejects_blank() {
        let err = required_text("name", "   ", 10).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn required_text_counts_characters_not_bytes() {
        assert!(required_text("name", "Ташкент", 7).is_ok());
        assert!(required_text("name", "Ташкент", 6).is_err());
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("short_name", Some(" "), 4).unwrap(), None);
        assert_eq!(optional_text("short_name", None, 4).unwrap(), None);
        assert!(optional_text("short_name", Some("TOOLONG"), 4).is_err());
    }
}
