use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Creator tag applied when a create request does not name one.
pub const DEFAULT_CREATOR: &str = "current-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(JobId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Open => f.pad("Open"),
            JobStatus::InProgress => f.pad("In Progress"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, fields: NewJob) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            budget: fields.budget,
            status: JobStatus::Open,
            created_by: Some(fields.created_by),
            created_at: Utc::now(),
        }
    }

    /// Build a seed listing. Seed jobs carry no creator tag.
    pub fn seed(id: JobId, title: &str, description: &str, budget: f64) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            budget,
            status: JobStatus::Open,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }

    pub fn created_by_is(&self, creator: &str) -> bool {
        self.created_by.as_deref() == Some(creator)
    }
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub budget: f64,
    #[serde(default = "default_creator")]
    pub created_by: String,
}

impl NewJob {
    pub fn new(title: impl Into<String>, description: impl Into<String>, budget: f64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            budget,
            created_by: default_creator(),
        }
    }

    pub fn created_by(mut self, creator: impl Into<String>) -> Self {
        self.created_by = creator.into();
        self
    }
}

/// Body of `PATCH /jobs/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
}

fn default_creator() -> String {
    DEFAULT_CREATOR.to_string()
}

// Form inputs post the budget as text, so both encodings are accepted.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("budget is not a number: {:?}", s))),
    }
}
