pub mod http;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::market::{Job, JobId, JobStatus, NewJob, NewProposal, Profile, Proposal, ProposalId};

pub use http::HttpApi;
pub use local::LocalApi;

/// Operations the marketplace API exposes to clients.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    async fn list_profiles(&self) -> Result<Vec<Profile>>;

    async fn create_job(&self, fields: NewJob) -> Result<Job>;

    async fn update_job_status(&self, id: JobId, status: JobStatus) -> Result<Job>;

    async fn delete_job(&self, id: JobId) -> Result<()>;

    async fn create_proposal(&self, fields: NewProposal) -> Result<Proposal>;

    async fn list_proposals(&self, job_id: JobId) -> Result<Vec<Proposal>>;

    async fn get_proposal(&self, id: ProposalId) -> Result<Proposal>;

    async fn delete_proposal(&self, id: ProposalId) -> Result<()>;
}
