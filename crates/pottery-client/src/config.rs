use reqwest::Url;

use crate::errors::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Where the pottery server lives and how to introduce ourselves.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; operation paths are appended to it.
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("pottery-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("base_url {:?}: {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ClientError::InvalidConfig("user_agent is empty".into()));
        }
        Ok(())
    }

    /// Absolute URL of an already encoded operation path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
