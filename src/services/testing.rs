// In-memory repositories for service tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ads::{Job, JobFilter, OptionalField, OptionalFieldThrough, ReconciliationPlan};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::{JobListing, JobRepository, OptionalFieldRepository, UserRepository};
use crate::domain::user::{Email, Phone, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    racing: Mutex<Option<User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Simulates another request inserting `user` just before our next insert
    pub fn insert_before_next_create(&self, user: User) {
        *self.racing.lock().unwrap() = Some(user);
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

fn conflict(field: &str) -> RepositoryError {
    RepositoryError::Conflict {
        field: field.to_string(),
        message: format!("Duplicate {}", field),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(winner) = self.racing.lock().unwrap().take() {
            users.push(winner);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(conflict("email"));
        }
        if user.social_auth_uid.is_some()
            && users.iter().any(|u| u.social_auth_uid == user.social_auth_uid)
        {
            return Err(conflict("social_auth_uid"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| RepositoryError::NotFound("User".to_string()))?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        Ok(self.find(|u| &u.email == email))
    }

    async fn find_by_phone(&self, phone: &Phone) -> RepositoryResult<Option<User>> {
        Ok(self.find(|u| u.phone.as_ref() == Some(phone)))
    }

    async fn find_by_social_uid(&self, uid: &str) -> RepositoryResult<Option<User>> {
        Ok(self.find(|u| u.social_auth_uid.as_deref() == Some(uid)))
    }

    async fn update_last_login(&self, _user_id: Uuid) -> RepositoryResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryOptionalFieldRepository {
    fields: Mutex<Vec<OptionalField>>,
}

impl InMemoryOptionalFieldRepository {
    pub fn with(fields: Vec<OptionalField>) -> Self {
        Self {
            fields: Mutex::new(fields),
        }
    }
}

#[async_trait]
impl OptionalFieldRepository for InMemoryOptionalFieldRepository {
    async fn create(&self, field: &OptionalField) -> RepositoryResult<()> {
        self.fields.lock().unwrap().push(field.clone());
        Ok(())
    }

    async fn update(&self, field: &OptionalField) -> RepositoryResult<()> {
        let mut fields = self.fields.lock().unwrap();
        if let Some(slot) = fields.iter_mut().find(|f| f.id == field.id) {
            *slot = field.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.fields.lock().unwrap().retain(|f| f.id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<OptionalField>> {
        Ok(self.fields.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<OptionalField>> {
        Ok(self
            .fields
            .lock()
            .unwrap()
            .iter()
            .filter(|f| ids.contains(&f.id))
            .cloned()
            .collect())
    }

    async fn list(&self, only_active: bool) -> RepositoryResult<Vec<OptionalField>> {
        Ok(self
            .fields
            .lock()
            .unwrap()
            .iter()
            .filter(|f| !only_active || f.is_active)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, Job>>,
    attachments: Mutex<Vec<OptionalFieldThrough>>,
}

impl InMemoryJobRepository {
    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.lock().unwrap().len()
    }

    fn listing(&self, job: Job) -> JobListing {
        JobListing {
            job,
            category_name: None,
            city: None,
            owner: None,
            attachments: Vec::new(),
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create_with_attachments(
        &self,
        job: &Job,
        attachments: &[OptionalFieldThrough],
    ) -> RepositoryResult<()> {
        self.jobs.lock().unwrap().insert(job.id(), job.clone());
        self.attachments.lock().unwrap().extend_from_slice(attachments);
        Ok(())
    }

    async fn update_with_attachments(
        &self,
        job: &Job,
        plan: Option<&ReconciliationPlan>,
    ) -> RepositoryResult<()> {
        if let Some(plan) = plan {
            let mut rows = self.attachments.lock().unwrap();
            let current: Vec<OptionalFieldThrough> =
                rows.iter().filter(|r| r.job_id == job.id()).cloned().collect();
            if !plan.is_current(&current) {
                return Err(RepositoryError::Stale("Job attachments changed".to_string()));
            }
            rows.retain(|r| !plan.delete.contains(&r.id));
            for patched in &plan.update {
                if let Some(slot) = rows.iter_mut().find(|r| r.id == patched.id) {
                    *slot = patched.clone();
                }
            }
            rows.extend(plan.create.iter().cloned());
        }
        self.jobs.lock().unwrap().insert(job.id(), job.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.jobs.lock().unwrap().remove(&id);
        self.attachments.lock().unwrap().retain(|r| r.job_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Job>> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn find_attachments(&self, job_id: Uuid) -> RepositoryResult<Vec<OptionalFieldThrough>> {
        Ok(self
            .attachments
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn find_listing(&self, id: Uuid) -> RepositoryResult<Option<JobListing>> {
        Ok(self.find_by_id(id).await?.map(|job| self.listing(job)))
    }

    async fn list(&self, filter: &JobFilter, page: PageRequest) -> RepositoryResult<Page<JobListing>> {
        let jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| filter.owner_id.is_none() || j.user_id() == filter.owner_id)
            .cloned()
            .collect();
        let count = jobs.len() as i64;
        let results = jobs.into_iter().map(|job| self.listing(job)).collect();
        Ok(Page::new(results, count, page))
    }
}
