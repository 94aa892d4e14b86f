use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::validation::{optional_text, required_text};

/// Listing category; `subcategory_id` points at the parent category
#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub subcategory_id: Option<Uuid>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub const MAX_NAME_LENGTH: usize = 100;

    pub fn new(name: &str, subcategory_id: Option<Uuid>, icon: Option<&str>) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: required_text("name", name, Self::MAX_NAME_LENGTH)?,
            subcategory_id,
            icon: optional_text("icon", icon, 500)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update, refusing to make the category its own ancestor
    ///
    /// `parent_chain` is the proposed parent followed by its ancestors.
    pub fn update(
        &mut self,
        name: &str,
        subcategory_id: Option<Uuid>,
        icon: Option<&str>,
        parent_chain: &[Category],
    ) -> DomainResult<()> {
        if subcategory_id == Some(self.id) || parent_chain.iter().any(|c| c.id == self.id) {
            return Err(DomainError::validation(
                "subcategory",
                "A category cannot be nested under itself.",
            ));
        }
        self.name = required_text("name", name, Self::MAX_NAME_LENGTH)?;
        self.subcategory_id = subcategory_id;
        self.icon = optional_text("icon", icon, 500)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}
