use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use super::Actor;
use crate::domain::ads::attachment::{self, AttachmentInput};
use crate::domain::ads::{Job, JobDraft, JobFlags, OptionalField, OptionalFieldThrough};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::{JobRepository, OptionalFieldRepository};

/// Listing writes together with their optional-field attachments
///
/// Every descriptor lookup and value check runs before the repository is
/// asked to write, and the repository applies the job row and its
/// attachment rows in one transaction.
pub struct JobService<'a, J, F>
where
    J: JobRepository + ?Sized,
    F: OptionalFieldRepository + ?Sized,
{
    pub jobs: &'a J,
    pub fields: &'a F,
}

impl<'a, J, F> JobService<'a, J, F>
where
    J: JobRepository + ?Sized,
    F: OptionalFieldRepository + ?Sized,
{
    pub fn new(jobs: &'a J, fields: &'a F) -> Self {
        Self { jobs, fields }
    }

    pub async fn create(
        &self,
        actor: Actor,
        draft: JobDraft,
        flags: JobFlags,
        additionally: &[AttachmentInput],
    ) -> DomainResult<Job> {
        ensure_flags_allowed(actor, &flags)?;

        let mut job = Job::new(actor.user_id, draft)?;
        if !flags.is_empty() {
            job.apply_flags(flags);
        }

        let fields = self.load_fields(additionally, &[]).await?;
        let rows = attachment::plan_create(job.id(), additionally, &fields)?;
        self.jobs.create_with_attachments(&job, &rows).await?;

        info!(job_id = %job.id(), attachments = rows.len(), "Job created");
        Ok(job)
    }

    /// Replaces a job's attributes
    ///
    /// `additionally: None` leaves the attachments untouched; `Some` (even
    /// empty) reconciles them to exactly the given list.
    pub async fn update(
        &self,
        actor: Actor,
        job_id: Uuid,
        draft: JobDraft,
        flags: JobFlags,
        additionally: Option<&[AttachmentInput]>,
    ) -> DomainResult<Job> {
        let mut job = self.find_modifiable(actor, job_id).await?;
        ensure_flags_allowed(actor, &flags)?;

        job.apply_draft(draft)?;
        if !flags.is_empty() {
            job.apply_flags(flags);
        }

        let plan = match additionally {
            None => None,
            Some(inputs) => {
                let existing = self.jobs.find_attachments(job_id).await?;
                let fields = self.load_fields(inputs, &existing).await?;
                Some(attachment::plan_update(job_id, &existing, inputs, &fields)?)
            }
        };

        self.jobs.update_with_attachments(&job, plan.as_ref()).await?;

        if let Some(plan) = &plan {
            info!(
                job_id = %job_id,
                created = plan.create.len(),
                updated = plan.update.len(),
                deleted = plan.delete.len(),
                "Job updated"
            );
        } else {
            info!(job_id = %job_id, "Job updated");
        }
        Ok(job)
    }

    pub async fn delete(&self, actor: Actor, job_id: Uuid) -> DomainResult<()> {
        self.find_modifiable(actor, job_id).await?;
        self.jobs.delete(job_id).await?;
        info!(job_id = %job_id, "Job deleted");
        Ok(())
    }

    async fn find_modifiable(&self, actor: Actor, job_id: Uuid) -> DomainResult<Job> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Job".to_string()))?;
        if !actor.can_modify(job.user_id()) {
            return Err(DomainError::Forbidden(
                "Only the owner or staff can modify this job".to_string(),
            ));
        }
        Ok(job)
    }

    async fn load_fields(
        &self,
        inputs: &[AttachmentInput],
        existing: &[OptionalFieldThrough],
    ) -> DomainResult<HashMap<Uuid, OptionalField>> {
        let ids = attachment::referenced_field_ids(inputs, existing);
        let fields = self.fields.find_by_ids(&ids).await?;
        Ok(fields.into_iter().map(|f| (f.id, f)).collect())
    }
}

fn ensure_flags_allowed(actor: Actor, flags: &JobFlags) -> DomainResult<()> {
    if !flags.is_empty() && !actor.is_staff {
        return Err(DomainError::Forbidden(
            "Only staff can change status, is_top or is_vip".to_string(),
        ));
    }
    Ok(())
}
