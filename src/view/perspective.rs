use std::str::FromStr;

/// Which set of actions the client exposes. This is a local view toggle,
/// not an identity: the API does not know about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Perspective {
    Client,
    #[default]
    Freelancer,
    Admin,
}

impl Perspective {
    pub const ALL: [Perspective; 3] = [
        Perspective::Client,
        Perspective::Freelancer,
        Perspective::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Client => "Client",
            Perspective::Freelancer => "Freelancer",
            Perspective::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Perspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Perspective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Perspective::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role {:?}, expected client, freelancer or admin", s))
    }
}
