use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileRole {
    Freelancer,
    Client,
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileRole::Freelancer => write!(f, "Freelancer"),
            ProfileRole::Client => write!(f, "Client"),
        }
    }
}

/// Static directory entry. Profiles are seeded at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub role: ProfileRole,
    pub rating: f32,
}

impl Profile {
    pub fn new(id: ProfileId, name: &str, role: ProfileRole, rating: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            role,
            rating,
        }
    }
}
