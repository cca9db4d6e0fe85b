//! Persistence boundary for applications.
//!
//! # Responsibilities
//! - Define the repository operations controllers depend on
//! - Provide an in-memory store with seed data
//!
//! # Design Decisions
//! - Controllers hold `Arc<dyn ApplicationStore>`; SQL backends plug in here
//! - Lists are newest first, paged with `offset = (page - 1) * limit`
//! - Lookups attach the applicant and job records

use std::sync::{PoisonError, RwLock};

use crate::app::model::{
    Application, ApplicationStatus, Job, PaginationMeta, User, UserRole,
};

/// Repository operations over applications and jobs.
pub trait ApplicationStore: Send + Sync {
    fn job(&self, job_id: i64) -> Option<Job>;

    /// One page of a job's applications, newest first.
    fn job_applications(
        &self,
        job_id: i64,
        page: u32,
        limit: u32,
    ) -> (Vec<Application>, PaginationMeta);

    fn application(&self, application_id: i64) -> Option<Application>;

    /// Persist the status and reason of `application`.
    fn update_application_status(&self, application: &Application);
}

/// Store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: RwLock<Vec<Application>>,
}

impl MemoryStore {
    pub fn new(users: Vec<User>, jobs: Vec<Job>, applications: Vec<Application>) -> Self {
        Self {
            users,
            jobs,
            applications: RwLock::new(applications),
        }
    }

    /// Two companies, two job seekers, three jobs and a few applications.
    pub fn seeded() -> Self {
        let user = |id: i64, name: &str, role: UserRole| User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
        };
        let job = |job_id: i64, company_id: i64, position: &str| Job {
            job_id,
            company_id,
            position: position.to_string(),
            job_type: "full-time".to_string(),
            location_type: "remote".to_string(),
            is_open: true,
        };
        let application = |application_id: i64, user_id: i64, job_id: i64, created_at: &str| {
            Application {
                application_id,
                user_id,
                job_id,
                status: ApplicationStatus::Waiting,
                status_reason: None,
                created_at: created_at.to_string(),
                user: None,
                job: None,
            }
        };

        Self::new(
            vec![
                user(1, "Acme", UserRole::Company),
                user(2, "Alice", UserRole::Jobseeker),
                user(3, "Bob", UserRole::Jobseeker),
                user(4, "Globex", UserRole::Company),
            ],
            vec![
                job(1, 1, "Backend Engineer"),
                job(2, 1, "Data Analyst"),
                job(3, 4, "Product Designer"),
            ],
            vec![
                application(1, 2, 1, "2024-03-01T09:00:00Z"),
                application(2, 3, 1, "2024-03-02T10:30:00Z"),
                application(3, 2, 2, "2024-03-03T08:15:00Z"),
                application(4, 3, 3, "2024-03-04T14:45:00Z"),
            ],
        )
    }

    fn attach(&self, mut application: Application) -> Application {
        application.user = self
            .users
            .iter()
            .find(|u| u.id == application.user_id)
            .cloned();
        application.job = self
            .jobs
            .iter()
            .find(|j| j.job_id == application.job_id)
            .cloned();
        application
    }
}

impl ApplicationStore for MemoryStore {
    fn job(&self, job_id: i64) -> Option<Job> {
        self.jobs.iter().find(|j| j.job_id == job_id).cloned()
    }

    fn job_applications(
        &self,
        job_id: i64,
        page: u32,
        limit: u32,
    ) -> (Vec<Application>, PaginationMeta) {
        let applications = self
            .applications
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut matching: Vec<&Application> = applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let data = matching
            .iter()
            .skip(offset)
            .take(limit as usize)
            .map(|a| self.attach((*a).clone()))
            .collect();

        (data, PaginationMeta::new(page, limit, matching.len() as u64))
    }

    fn application(&self, application_id: i64) -> Option<Application> {
        let applications = self
            .applications
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        applications
            .iter()
            .find(|a| a.application_id == application_id)
            .cloned()
            .map(|a| self.attach(a))
    }

    fn update_application_status(&self, application: &Application) {
        let mut applications = self
            .applications
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(stored) = applications
            .iter_mut()
            .find(|a| a.application_id == application.application_id)
        {
            stored.status = application.status;
            stored.status_reason = application.status_reason.clone();
        }
    }
}
