// Translation of PostgreSQL constraint violations into repository errors

use crate::domain::errors::RepositoryError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps errors raised by INSERT/UPDATE statements
///
/// A foreign key violation here means the row points at something that
/// does not exist.
pub fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match violation(&err) {
        Some((UNIQUE_VIOLATION, constraint)) => unique_conflict(&constraint),
        Some((FOREIGN_KEY_VIOLATION, constraint)) => invalid_reference(&constraint),
        _ => RepositoryError::Database(err),
    }
}

/// Maps errors raised by DELETE statements
///
/// A foreign key violation here means other rows still reference the row.
pub fn map_delete_error(err: sqlx::Error) -> RepositoryError {
    match violation(&err) {
        Some((FOREIGN_KEY_VIOLATION, constraint)) => still_referenced(&constraint),
        _ => RepositoryError::Database(err),
    }
}

fn violation(err: &sqlx::Error) -> Option<(&'static str, String)> {
    let sqlx::Error::Database(db) = err else {
        return None;
    };
    let code = match db.code()?.as_ref() {
        UNIQUE_VIOLATION => UNIQUE_VIOLATION,
        FOREIGN_KEY_VIOLATION => FOREIGN_KEY_VIOLATION,
        _ => return None,
    };
    Some((code, db.constraint().unwrap_or_default().to_string()))
}

fn unique_conflict(constraint: &str) -> RepositoryError {
    let (field, message) = match constraint {
        "users_email_key" => ("email", "A user with this email already exists"),
        "users_phone_key" => ("phone", "A user with this phone number already exists"),
        "users_social_auth_uid_key" => ("social_auth_uid", "This social account is already linked"),
        "countries_short_name_key" => ("short_name", "A country with this short name already exists"),
        _ => ("non_field_errors", "Duplicate value"),
    };
    RepositoryError::Conflict {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn invalid_reference(constraint: &str) -> RepositoryError {
    let (field, message) = match constraint {
        "jobs_category_id_fkey" => ("category", "Category does not exist"),
        "jobs_city_id_fkey" => ("city", "City does not exist"),
        "jobs_user_id_fkey" => ("user", "User does not exist"),
        "categories_subcategory_id_fkey" => ("subcategory", "Parent category does not exist"),
        "cities_country_id_fkey" => ("country", "Country does not exist"),
        "optional_field_through_optional_field_id_fkey" => {
            ("optionalFieldID", "OptionalField does not exist")
        }
        "optional_field_through_job_id_fkey" => ("job", "Job does not exist"),
        "reviews_job_id_fkey" => ("job", "Job does not exist"),
        "reviews_user_id_fkey" => ("user", "User does not exist"),
        "team_members_role_id_fkey" => ("role", "Team role does not exist"),
        _ => ("non_field_errors", "Referenced object does not exist"),
    };
    RepositoryError::InvalidReference {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn still_referenced(constraint: &str) -> RepositoryError {
    let message = match constraint {
        "categories_subcategory_id_fkey" => "Category still has subcategories",
        "jobs_city_id_fkey" => "City is still used by listings",
        "jobs_user_id_fkey" => "User still owns listings",
        "team_members_role_id_fkey" => "Team role is still assigned to members",
        _ => "Object is still referenced",
    };
    RepositoryError::InUse(message.to_string())
}

/// Wraps a value the database returned but the domain rejects
pub(crate) fn corrupt_row(what: &str, reason: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Database(sqlx::Error::Decode(
        format!("Invalid {} from database: {}", what, reason).into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_unique_constraint_still_conflicts() {
        match unique_conflict("something_else") {
            RepositoryError::Conflict { field, .. } => assert_eq!(field, "non_field_errors"),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn job_references_map_to_request_fields() {
        match invalid_reference("jobs_city_id_fkey") {
            RepositoryError::InvalidReference { field, .. } => assert_eq!(field, "city"),
            other => panic!("Expected InvalidReference, got {:?}", other),
        }
        match invalid_reference("optional_field_through_optional_field_id_fkey") {
            RepositoryError::InvalidReference { field, .. } => assert_eq!(field, "optionalFieldID"),
            other => panic!("Expected InvalidReference, got {:?}", other),
        }
    }

    #[test]
    fn delete_violations_are_in_use() {
        assert!(matches!(
            still_referenced("team_members_role_id_fkey"),
            RepositoryError::InUse(_)
        ));
    }

    #[test]
    fn non_database_errors_pass_through() {
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
        assert!(matches!(
            map_delete_error(sqlx::Error::PoolTimedOut),
            RepositoryError::Database(sqlx::Error::PoolTimedOut)
        ));
    }
}
