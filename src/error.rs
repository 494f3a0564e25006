use thiserror::Error;

use crate::market::{JobId, ProposalId};
use crate::view::Perspective;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Missing or invalid field: {0}")]
    Validation(&'static str),

    #[error("Proposal {proposal} belongs to job {owner}, not job {job}")]
    ProposalMismatch {
        proposal: ProposalId,
        job: JobId,
        owner: JobId,
    },

    #[error("A proposal submission is already in flight")]
    SubmissionInFlight,

    #[error("Application already pending for job {0}")]
    AlreadyApplied(JobId),

    #[error("{action} is not available in the {perspective} view")]
    Unavailable {
        action: &'static str,
        perspective: Perspective,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketError {
    /// True for the only domain error kind the API reports.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MarketError::JobNotFound(_) | MarketError::ProposalNotFound(_)
        ) || matches!(self, MarketError::Api { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
