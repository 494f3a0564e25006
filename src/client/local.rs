use async_trait::async_trait;

use crate::client::MarketplaceApi;
use crate::error::Result;
use crate::market::{
    Job, JobId, JobStatus, NewJob, NewProposal, Profile, Proposal, ProposalId, SharedStore,
};

/// Calls straight into a shared store, skipping HTTP.
#[derive(Clone)]
pub struct LocalApi {
    store: SharedStore,
}

impl LocalApi {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MarketplaceApi for LocalApi {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let store = self.store.read().await;
        Ok(store.list_jobs().into_iter().cloned().collect())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let store = self.store.read().await;
        Ok(store.list_profiles().into_iter().cloned().collect())
    }

    async fn create_job(&self, fields: NewJob) -> Result<Job> {
        Ok(self.store.write().await.create_job(fields))
    }

    async fn update_job_status(&self, id: JobId, status: JobStatus) -> Result<Job> {
        self.store.write().await.update_job_status(id, status)
    }

    async fn delete_job(&self, id: JobId) -> Result<()> {
        self.store.write().await.delete_job(id);
        Ok(())
    }

    async fn create_proposal(&self, fields: NewProposal) -> Result<Proposal> {
        Ok(self.store.write().await.create_proposal(fields))
    }

    async fn list_proposals(&self, job_id: JobId) -> Result<Vec<Proposal>> {
        let store = self.store.read().await;
        Ok(store.proposals_for_job(job_id).into_iter().cloned().collect())
    }

    async fn get_proposal(&self, id: ProposalId) -> Result<Proposal> {
        self.store.read().await.get_proposal(id).cloned()
    }

    async fn delete_proposal(&self, id: ProposalId) -> Result<()> {
        self.store.write().await.delete_proposal(id);
        Ok(())
    }
}
