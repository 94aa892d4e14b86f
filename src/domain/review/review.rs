use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::Rating;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::value_objects::Email;
use crate::domain::validation::required_text;

/// Input for writing a review
#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub job_id: Uuid,
    pub rating: i16,
    pub description: Option<String>,
    pub first_name: String,
    pub email: String,
}

/// A user's review of a listing
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Option<Uuid>,
    pub rating: Rating,
    pub description: String,
    pub first_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub const MAX_FIRST_NAME_LENGTH: usize = 200;

    pub fn new(author: Uuid, draft: ReviewDraft) -> DomainResult<Self> {
        let (rating, first_name, email) = Self::check(&draft)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            job_id: draft.job_id,
            user_id: Some(author),
            rating,
            description: draft.description.unwrap_or_default(),
            first_name,
            email,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable attributes; the author never changes
    pub fn update(&mut self, draft: ReviewDraft) -> DomainResult<()> {
        let (rating, first_name, email) = Self::check(&draft)?;
        self.job_id = draft.job_id;
        self.rating = rating;
        self.description = draft.description.unwrap_or_default();
        self.first_name = first_name;
        self.email = email;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_written_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    fn check(draft: &ReviewDraft) -> DomainResult<(Rating, String, Email)> {
        let rating = Rating::new(draft.rating).map_err(|e| DomainError::validation("rating", e))?;
        let first_name = required_text("first_name", &draft.first_name, Self::MAX_FIRST_NAME_LENGTH)?;
        let email = Email::new(draft.email.as_str()).map_err(|e| DomainError::validation("email", e))?;
        Ok((rating, first_name, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ReviewDraft {
        ReviewDraft {
            job_id: Uuid::new_v4(),
            rating: 4,
            description: Some("Quick replies".to_string()),
            first_name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
        }
    }

    #[test]
    fn new_review_belongs_to_author() {
        let author = Uuid::new_v4();
        let review = Review::new(author, draft()).unwrap();
        assert!(review.is_written_by(author));
        assert_eq!(review.rating.value(), 4);
    }

    #[test]
    fn invalid_rating_is_a_field_error() {
        let err = Review::new(Uuid::new_v4(), ReviewDraft { rating: 9, ..draft() }).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "rating"));
    }

    #[test]
    fn update_keeps_author() {
        let author = Uuid::new_v4();
        let mut review = Review::new(author, draft()).unwrap();
        review
            .update(ReviewDraft {
                rating: 2,
                ..draft()
            })
            .unwrap();
        assert_eq!(review.rating.value(), 2);
        assert!(review.is_written_by(author));
    }

    #[test]
    fn blank_name_rejected() {
        let err = Review::new(
            Uuid::new_v4(),
            ReviewDraft {
                first_name: "  ".to_string(),
                ..draft()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "first_name"));
    }
}
