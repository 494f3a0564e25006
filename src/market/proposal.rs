use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::market::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub u64);

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProposalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ProposalId)
    }
}

/// A freelancer's bid. The parent job is not required to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub job_id: JobId,
    pub freelancer_name: String,
    pub cover_letter: String,
}

impl Proposal {
    pub fn new(id: ProposalId, fields: NewProposal) -> Self {
        Self {
            id,
            job_id: fields.job_id,
            freelancer_name: fields.freelancer_name,
            cover_letter: fields.cover_letter,
        }
    }
}

/// Body of `POST /proposals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub job_id: JobId,
    pub freelancer_name: String,
    pub cover_letter: String,
}
