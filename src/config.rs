use std::net::SocketAddr;

/// Name the client submits proposals under unless configured otherwise.
pub const DEFAULT_FREELANCER_NAME: &str = "Expert Dev";
pub const DEFAULT_COVER_LETTER: &str = "I'm the best fit!";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Load the demo jobs and profiles at startup
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            seed: true,
        }
    }
}

impl ServerConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn without_seed(mut self) -> Self {
        self.seed = false;
        self
    }
}

/// Settings for the terminal client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash
    pub base_url: String,
    /// Name attached to proposals and used by the duplicate-application check
    pub freelancer_name: String,
    pub cover_letter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            freelancer_name: DEFAULT_FREELANCER_NAME.to_string(),
            cover_letter: DEFAULT_COVER_LETTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn with_freelancer(
        mut self,
        name: impl Into<String>,
        cover_letter: impl Into<String>,
    ) -> Self {
        self.freelancer_name = name.into();
        self.cover_letter = cover_letter.into();
        self
    }
}
