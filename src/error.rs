#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Soft failure; callers fall back to IMDSv1-style requests without a token.
    #[error("IMDS session token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("Instance metadata unavailable ({path}): {reason}")]
    MetadataUnavailable { path: String, reason: String },

    #[error("Malformed credential payload for role {role}: {reason}")]
    MalformedCredentialPayload { role: String, reason: String },

    #[error("No credentials found with AccessKeyId {0}")]
    CredentialNotFound(String),

    #[error("Credentials for role {role} are not available: {}", .message.as_deref().unwrap_or("Code is not Success"))]
    RoleCredentialsFailed {
        role: String,
        message: Option<String>,
    },

    #[error(transparent)]
    UrlError(#[from] url::ParseError),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn metadata_unavailable(path: &str, reason: impl std::fmt::Display) -> Self {
        Self::MetadataUnavailable {
            path: path.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// True when the failure came from the metadata service being unreachable or refusing a read.
    pub fn is_metadata_unavailable(&self) -> bool {
        matches!(*self, Self::MetadataUnavailable { .. })
    }
}
