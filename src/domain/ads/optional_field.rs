use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::validation::required_text;

/// Declared type of a dynamic field
///
/// Decides how an attached value is checked: scalar types validate the
/// text `value`, while `Image` and `File` expect a stored media path in the
/// matching slot of the attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "optional_field_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Boolean,
    Date,
    Time,
    DateTime,
    Float,
    Image,
    File,
}

impl FieldType {
    /// True for types whose content lives in the `value` column
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldType::Image | FieldType::File)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Float => "float",
            FieldType::Image => "image",
            FieldType::File => "file",
        };
        write!(f, "{}", name)
    }
}

/// Input for creating or replacing a field descriptor
#[derive(Debug, Clone, Default)]
pub struct OptionalFieldDefinition {
    pub name: String,
    pub key: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub default_value: Option<String>,
    pub max_length: Option<i32>,
    pub min_length: Option<i32>,
    pub is_active: bool,
}

/// Administrator-defined descriptor for a dynamic listing field
///
/// Listings attach values for these descriptors through
/// [`OptionalFieldThrough`](super::attachment::OptionalFieldThrough) rows.
///
/// # Invariants
/// - `name` is 1..=30 characters, `key` is 1..=12 characters
/// - `min_length` and `max_length` are non-negative and `min <= max`
/// - `default_value`, when set, satisfies the declared type
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalField {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub default_value: Option<String>,
    pub max_length: Option<i32>,
    pub min_length: Option<i32>,
    pub is_active: bool,
}

impl OptionalField {
    pub const MAX_NAME_LENGTH: usize = 30;
    pub const MAX_KEY_LENGTH: usize = 12;

    /// Creates a descriptor from an administrator's definition
    ///
    /// # Example
    /// ```
    /// use jobboard_api::domain::ads::optional_field::{
    ///     FieldType, OptionalField, OptionalFieldDefinition,
    /// };
    ///
    /// let field = OptionalField::new(OptionalFieldDefinition {
    ///     name: "Salary".to_string(),
    ///     key: "salary".to_string(),
    ///     field_type: FieldType::Integer,
    ///     is_active: true,
    ///     ..Default::default()
    /// })
    /// .expect("valid descriptor");
    ///
    /// assert!(field.check_value(Some("1500"), None, None).is_ok());
    /// assert!(field.check_value(Some("a lot"), None, None).is_err());
    /// ```
    pub fn new(definition: OptionalFieldDefinition) -> DomainResult<Self> {
        let mut field = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            key: String::new(),
            field_type: FieldType::default(),
            is_required: false,
            default_value: None,
            max_length: None,
            min_length: None,
            is_active: true,
        };
        field.update(definition)?;
        Ok(field)
    }

    /// Replaces every attribute of the descriptor
    pub fn update(&mut self, definition: OptionalFieldDefinition) -> DomainResult<()> {
        let name = required_text("name", &definition.name, Self::MAX_NAME_LENGTH)?;
        let key = required_text("key", &definition.key, Self::MAX_KEY_LENGTH)?;

        for (field, bound) in [
            ("min_length", definition.min_length),
            ("max_length", definition.max_length),
        ] {
            if bound.is_some_and(|b| b < 0) {
                return Err(DomainError::validation(
                    field,
                    "Ensure this value is greater than or equal to 0.",
                ));
            }
        }
        if let (Some(min), Some(max)) = (definition.min_length, definition.max_length) {
            if min > max {
                return Err(DomainError::validation(
                    "min_length",
                    "min_length cannot be greater than max_length.",
                ));
            }
        }

        let candidate = Self {
            id: self.id,
            name,
            key,
            field_type: definition.field_type,
            is_required: definition.is_required,
            default_value: definition.default_value.filter(|v| !v.trim().is_empty()),
            max_length: definition.max_length,
            min_length: definition.min_length,
            is_active: definition.is_active,
        };

        if let Some(default) = candidate.default_value.as_deref() {
            if !candidate.field_type.is_scalar() {
                return Err(DomainError::validation(
                    "default",
                    format!("A default value is not supported for {} fields.", candidate.field_type),
                ));
            }
            candidate
                .check_scalar(default)
                .map_err(|msg| DomainError::validation("default", msg))?;
        }

        *self = candidate;
        Ok(())
    }

    /// The value stored for an attachment: the given value, or the default
    pub fn effective_value(&self, value: Option<&str>) -> Option<String> {
        value
            .filter(|v| !v.trim().is_empty())
            .or(self.default_value.as_deref())
            .map(str::to_string)
    }

    /// Checks one attachment's content against this descriptor
    ///
    /// Returns a human readable reason on failure.
    pub fn check_value(
        &self,
        value: Option<&str>,
        image: Option<&str>,
        file: Option<&str>,
    ) -> Result<(), String> {
        let present = |slot: Option<&str>| slot.is_some_and(|s| !s.trim().is_empty());

        if let Some(path) = image.filter(|p| present(Some(p))) {
            check_media_path("image", path)?;
        }
        if let Some(path) = file.filter(|p| present(Some(p))) {
            check_media_path("file", path)?;
        }

        match self.field_type {
            FieldType::Image => {
                if self.is_required && !present(image) {
                    return Err("an image is required".to_string());
                }
                Ok(())
            }
            FieldType::File => {
                if self.is_required && !present(file) {
                    return Err("a file is required".to_string());
                }
                Ok(())
            }
            _ => match self.effective_value(value) {
                Some(value) => self.check_scalar(&value),
                None if self.is_required => Err("a value is required".to_string()),
                None => Ok(()),
            },
        }
    }

    fn check_scalar(&self, value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        match self.field_type {
            FieldType::String => {
                let length = value.chars().count() as i64;
                if let Some(min) = self.min_length {
                    if length < i64::from(min) {
                        return Err(format!("must be at least {} characters", min));
                    }
                }
                if let Some(max) = self.max_length {
                    if length > i64::from(max) {
                        return Err(format!("must be at most {} characters", max));
                    }
                }
                Ok(())
            }
            FieldType::Integer => trimmed
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid integer", value)),
            FieldType::Float => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(()),
                _ => Err(format!("'{}' is not a valid number", value)),
            },
            FieldType::Boolean => parse_bool(trimmed)
                .map(|_| ())
                .ok_or_else(|| format!("'{}' is not a valid boolean", value)),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid date (YYYY-MM-DD)", value)),
            FieldType::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid time (HH:MM[:SS])", value)),
            FieldType::DateTime => {
                let valid = DateTime::parse_from_rfc3339(trimmed).is_ok()
                    || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").is_ok()
                    || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M").is_ok();
                if valid {
                    Ok(())
                } else {
                    Err(format!("'{}' is not a valid datetime", value))
                }
            }
            FieldType::Image | FieldType::File => Ok(()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Accepts only paths handed out by the media upload: `<dir>/<name>`
fn check_media_path(dir: &str, path: &str) -> Result<(), String> {
    let name = path
        .strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| format!("{} must be an uploaded {} path", dir, dir))?;

    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_whitespace);
    if !valid {
        return Err(format!("{} must be an uploaded {} path", dir, dir));
    }
    Ok(())
}
