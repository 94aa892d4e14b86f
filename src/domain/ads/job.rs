use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::value_objects::Email;
use crate::domain::validation::{optional_text, required_text};

/// Moderation status of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Published,
    UnderReview,
    Approved,
    Draft,
    Rejected,
    Archived,
    Blocked,
}

/// Owner-editable listing attributes
#[derive(Debug, Clone, Default)]
pub struct JobDraft {
    pub title: String,
    pub category_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub photo: Option<String>,
}

/// Attributes only staff may change
#[derive(Debug, Clone, Copy, Default)]
pub struct JobFlags {
    pub status: Option<JobStatus>,
    pub is_top: Option<bool>,
    pub is_vip: Option<bool>,
}

impl JobFlags {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.is_top.is_none() && self.is_vip.is_none()
    }
}

/// Job/ad listing aggregate root
///
/// The dynamic optional-field values attached to a listing live in
/// separate through-rows and are reconciled by the job service.
///
/// # Invariants
/// - Title is non-empty and at most 200 characters
/// - Contact number is at most 18 characters
/// - Contact e-mail, when present, is a valid address
#[derive(Debug, Clone)]
pub struct Job {
    id: Uuid,
    title: String,
    category_id: Option<Uuid>,
    city_id: Option<Uuid>,
    description: String,
    contact_number: Option<String>,
    email: Option<String>,
    name: Option<String>,
    user_id: Option<Uuid>,
    status: JobStatus,
    photo: Option<String>,
    is_vip: bool,
    is_top: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    pub const MAX_TITLE_LENGTH: usize = 200;
    pub const MAX_NAME_LENGTH: usize = 200;
    pub const MAX_CONTACT_NUMBER_LENGTH: usize = 18;

    /// Creates a new published listing owned by `owner`
    pub fn new(owner: Uuid, draft: JobDraft) -> DomainResult<Self> {
        let now = Utc::now();
        let mut job = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            category_id: None,
            city_id: None,
            description: String::new(),
            contact_number: None,
            email: None,
            name: None,
            user_id: Some(owner),
            status: JobStatus::default(),
            photo: None,
            is_vip: false,
            is_top: false,
            created_at: now,
            updated_at: now,
        };
        job.apply_draft(draft)?;
        job.updated_at = now;
        Ok(job)
    }

    /// Replaces the owner-editable attributes
    pub fn apply_draft(&mut self, draft: JobDraft) -> DomainResult<()> {
        let title = required_text("title", &draft.title, Self::MAX_TITLE_LENGTH)?;
        let contact_number = optional_text(
            "contact_number",
            draft.contact_number.as_deref(),
            Self::MAX_CONTACT_NUMBER_LENGTH,
        )?;
        let name = optional_text("name", draft.name.as_deref(), Self::MAX_NAME_LENGTH)?;
        let email = match draft.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Email::new(raw)
                    .map_err(|e| DomainError::validation("email", e))?
                    .as_str()
                    .to_string(),
            ),
        };

        self.title = title;
        self.category_id = draft.category_id;
        self.city_id = draft.city_id;
        self.description = draft.description.unwrap_or_default();
        self.contact_number = contact_number;
        self.email = email;
        self.name = name;
        self.photo = draft.photo.filter(|p| !p.trim().is_empty());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Applies staff-only moderation flags
    pub fn apply_flags(&mut self, flags: JobFlags) {
        if let Some(status) = flags.status {
            self.status = status;
        }
        if let Some(is_top) = flags.is_top {
            self.is_top = is_top;
        }
        if let Some(is_vip) = flags.is_vip {
            self.is_vip = is_vip;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    pub fn city_id(&self) -> Option<Uuid> {
        self.city_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn contact_number(&self) -> Option<&str> {
        self.contact_number.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn is_vip(&self) -> bool {
        self.is_vip
    }

    pub fn is_top(&self) -> bool {
        self.is_top
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Job from persistence layer data
    ///
    /// Bypasses validation; only repository implementations should call it.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        title: String,
        category_id: Option<Uuid>,
        city_id: Option<Uuid>,
        description: String,
        contact_number: Option<String>,
        email: Option<String>,
        name: Option<String>,
        user_id: Option<Uuid>,
        status: JobStatus,
        photo: Option<String>,
        is_vip: bool,
        is_top: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            category_id,
            city_id,
            description,
            contact_number,
            email,
            name,
            user_id,
            status,
            photo,
            is_vip,
            is_top,
            created_at,
            updated_at,
        }
    }
}

/// Criteria for listing jobs
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub city_ids: Vec<Uuid>,
    pub only_top: bool,
    pub only_vip: bool,
    pub owner_id: Option<Uuid>,
}
