use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::validation::required_text;

const MAX_NAME_LENGTH: usize = 100;

/// A position shown in the public team directory
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRole {
    pub id: Uuid,
    pub name: String,
}

impl TeamRole {
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required_text("name", name, MAX_NAME_LENGTH)?,
        })
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = required_text("name", name, MAX_NAME_LENGTH)?;
        Ok(())
    }
}

/// Input for creating or replacing a team member
#[derive(Debug, Clone, Default)]
pub struct TeamMemberDraft {
    pub name: String,
    pub description: Option<String>,
    pub photo: String,
    pub role_id: Uuid,
}

/// Team member aggregate
///
/// # Invariants
/// - Name is non-empty and at most 100 characters
/// - Photo path is always present
///
/// # Example
/// ```
/// use jobboard_api::domain::team::{TeamMember, TeamMemberDraft};
/// use uuid::Uuid;
///
/// let role_id = Uuid::new_v4();
/// let member = TeamMember::new(TeamMemberDraft {
///     name: "Dana".to_string(),
///     description: None,
///     photo: "image/dana.png".to_string(),
///     role_id,
/// })
/// .expect("valid member");
///
/// assert_eq!(member.name(), "Dana");
/// assert_eq!(member.role_id(), role_id);
/// ```
#[derive(Debug, Clone)]
pub struct TeamMember {
    id: Uuid,
    name: String,
    description: String,
    photo: String,
    role_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(draft: TeamMemberDraft) -> DomainResult<Self> {
        let now = Utc::now();
        let mut member = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            photo: String::new(),
            role_id: draft.role_id,
            created_at: now,
            updated_at: now,
        };
        member.update(draft)?;
        member.updated_at = now;
        Ok(member)
    }

    /// Replaces every editable attribute
    pub fn update(&mut self, draft: TeamMemberDraft) -> DomainResult<()> {
        let name = required_text("name", &draft.name, MAX_NAME_LENGTH)?;
        let photo = draft.photo.trim();
        if photo.is_empty() {
            return Err(DomainError::validation("photo", "This field is required."));
        }

        self.name = name;
        self.description = draft.description.unwrap_or_default();
        self.photo = photo.to_string();
        self.role_id = draft.role_id;
        self.updated_at = Utc::now();
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn photo(&self) -> &str {
        &self.photo
    }

    pub fn role_id(&self) -> Uuid {
        self.role_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a TeamMember from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: Uuid,
        name: String,
        description: String,
        photo: String,
        role_id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            photo,
            role_id,
            created_at,
            updated_at,
        }
    }
}
