use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Login was rejected, or answered without establishing a session.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A listing or release page answered with a non-success status.
    #[error("failed to load {url} (status: {status})")]
    Fetch { url: String, status: u16 },

    /// The request could not be completed at all.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ImportError {
    pub(crate) fn transport(url: &str, source: anyhow::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }
}
