use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::Message;
use crate::client::MarketplaceApi;
use crate::config::ClientConfig;
use crate::error::{MarketError, Result};
use crate::market::{
    Job, JobId, JobStatus, NewJob, NewProposal, Profile, Proposal, ProposalId, StatusUpdate,
};

/// JSON-over-HTTP client for the marketplace API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Decode a success body, or turn the `{"message": ...}` payload of a
    /// failed response into `MarketError::Api`.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<Message>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        tracing::debug!(status = status.as_u16(), message = %message, "API request failed");
        Err(MarketError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MarketplaceApi for HttpApi {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let response = self.request(Method::GET, "/jobs").send().await?;
        Self::decode(response).await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let response = self.request(Method::GET, "/profiles").send().await?;
        Self::decode(response).await
    }

    async fn create_job(&self, fields: NewJob) -> Result<Job> {
        let response = self
            .request(Method::POST, "/jobs")
            .json(&fields)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_job_status(&self, id: JobId, status: JobStatus) -> Result<Job> {
        let response = self
            .request(Method::PATCH, &format!("/jobs/{}", id))
            .json(&StatusUpdate { status })
            .send()
            .await?;
        match Self::decode(response).await {
            Err(MarketError::Api { status: 404, .. }) => Err(MarketError::JobNotFound(id)),
            other => other,
        }
    }

    async fn delete_job(&self, id: JobId) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/jobs/{}", id))
            .send()
            .await?;
        Self::decode::<Message>(response).await.map(|_| ())
    }

    async fn create_proposal(&self, fields: NewProposal) -> Result<Proposal> {
        let response = self
            .request(Method::POST, "/proposals")
            .json(&fields)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_proposals(&self, job_id: JobId) -> Result<Vec<Proposal>> {
        let response = self
            .request(Method::GET, &format!("/proposals/{}", job_id))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_proposal(&self, id: ProposalId) -> Result<Proposal> {
        let response = self
            .request(Method::GET, &format!("/proposals/by-id/{}", id))
            .send()
            .await?;
        match Self::decode(response).await {
            Err(MarketError::Api { status: 404, .. }) => Err(MarketError::ProposalNotFound(id)),
            other => other,
        }
    }

    async fn delete_proposal(&self, id: ProposalId) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/proposals/{}", id))
            .send()
            .await?;
        Self::decode::<Message>(response).await.map(|_| ())
    }
}
