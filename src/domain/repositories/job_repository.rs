use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ads::{
    AttachmentView, Country, Job, JobFilter, OptionalFieldThrough, ReconciliationPlan,
};
use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};

/// Public fields of a listing's owner
#[derive(Debug, Clone)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CitySummary {
    pub id: Uuid,
    pub name: String,
    pub country: Option<Country>,
}

/// A job joined with everything its detail view shows
#[derive(Debug, Clone)]
pub struct JobListing {
    pub job: Job,
    pub category_name: Option<String>,
    pub city: Option<CitySummary>,
    pub owner: Option<OwnerSummary>,
    pub attachments: Vec<AttachmentView>,
}

/// Repository trait for the Job aggregate and its attachments
///
/// Writes that touch attachments run in one transaction: either the job
/// and every planned row change are committed, or nothing is.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a job together with its through-rows
    async fn create_with_attachments(
        &self,
        job: &Job,
        attachments: &[OptionalFieldThrough],
    ) -> RepositoryResult<()>;

    /// Update a job's columns and, when given, apply an attachment plan
    async fn update_with_attachments(
        &self,
        job: &Job,
        plan: Option<&ReconciliationPlan>,
    ) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Job>>;

    /// Current through-rows of a job
    async fn find_attachments(&self, job_id: Uuid) -> RepositoryResult<Vec<OptionalFieldThrough>>;

    async fn find_listing(&self, id: Uuid) -> RepositoryResult<Option<JobListing>>;

    /// Newest-first page of listings matching `filter`
    async fn list(&self, filter: &JobFilter, page: PageRequest) -> RepositoryResult<Page<JobListing>>;
}
