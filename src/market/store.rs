use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{MarketError, Result};
use crate::market::job::{Job, JobId, JobStatus, NewJob};
use crate::market::profile::{Profile, ProfileId, ProfileRole};
use crate::market::proposal::{NewProposal, Proposal, ProposalId};

/// Store handle shared between request handlers.
pub type SharedStore = Arc<RwLock<Store>>;

/// In-memory collections of jobs, proposals and profiles.
///
/// Identifiers come from per-collection counters that only move forward, so
/// an id is never handed out twice even after the entity is deleted.
#[derive(Debug)]
pub struct Store {
    jobs: BTreeMap<JobId, Job>,
    proposals: BTreeMap<ProposalId, Proposal>,
    profiles: BTreeMap<ProfileId, Profile>,
    next_job_id: u64,
    next_proposal_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
            proposals: BTreeMap::new(),
            profiles: BTreeMap::new(),
            next_job_id: 1,
            next_proposal_id: 1,
        }
    }

    /// A store holding the demo listings and the two directory profiles.
    pub fn seeded() -> Self {
        let mut store = Self::new();

        for job in [
            Job::seed(
                JobId(1),
                "Build a React Logo",
                "I need a scalable vector graphic of the React logo.",
                50.0,
            ),
            Job::seed(
                JobId(2),
                "Fix my API",
                "My Express server keeps crashing on startup.",
                100.0,
            ),
        ] {
            store.next_job_id = store.next_job_id.max(job.id.0 + 1);
            store.jobs.insert(job.id, job);
        }

        for profile in [
            Profile::new(ProfileId(1), "Solo Developer", ProfileRole::Freelancer, 5.0),
            Profile::new(ProfileId(2), "Tech Startup", ProfileRole::Client, 4.9),
        ] {
            store.profiles.insert(profile.id, profile);
        }

        store
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// All jobs, oldest first
    pub fn list_jobs(&self) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs.values().collect();
        jobs.sort_by_key(|j| (j.created_at, j.id));
        jobs
    }

    pub fn list_profiles(&self) -> Vec<&Profile> {
        self.profiles.values().collect()
    }

    pub fn get_job(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Insert a new Open job and return it
    pub fn create_job(&mut self, fields: NewJob) -> Job {
        let id = JobId(self.next_job_id);
        self.next_job_id += 1;

        let job = Job::new(id, fields);
        self.jobs.insert(id, job.clone());
        job
    }

    /// Set a job's status. Nothing changes when the id is unknown.
    pub fn update_job_status(&mut self, id: JobId, status: JobStatus) -> Result<Job> {
        let job = self
            .jobs
            .get_mut(&id)
            .ok_or(MarketError::JobNotFound(id))?;
        job.status = status;
        Ok(job.clone())
    }

    /// Remove a job. Proposals pointing at it are left in place.
    /// Returns whether anything was removed.
    pub fn delete_job(&mut self, id: JobId) -> bool {
        self.jobs.remove(&id).is_some()
    }

    pub fn create_proposal(&mut self, fields: NewProposal) -> Proposal {
        let id = ProposalId(self.next_proposal_id);
        self.next_proposal_id += 1;

        let proposal = Proposal::new(id, fields);
        self.proposals.insert(id, proposal.clone());
        proposal
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<&Proposal> {
        self.proposals
            .get(&id)
            .ok_or(MarketError::ProposalNotFound(id))
    }

    /// Proposals whose parent id matches, in creation order
    pub fn proposals_for_job(&self, job_id: JobId) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| p.job_id == job_id)
            .collect()
    }

    pub fn delete_proposal(&mut self, id: ProposalId) -> bool {
        self.proposals.remove(&id).is_some()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}
