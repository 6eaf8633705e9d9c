//! Credentials handed off to downstream service clients

#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub access_key_id: String,
    pub secret_access_key: crate::credentials::AwsSecretAccessKey,
    pub session_token: String,
    pub region: Option<String>,
    pub expiration: Option<chrono::DateTime<chrono::Utc>>,
}

impl ResolvedSession {
    /// Only called with a credential set whose status is Success.
    pub(crate) fn new(creds: crate::credentials::RoleCredentialSet, region: Option<String>) -> Self {
        debug_assert!(creds.is_success());
        Self {
            access_key_id: creds.access_key_id,
            secret_access_key: creds.secret_access_key,
            session_token: creds.session_token,
            region,
            expiration: creds.expiration,
        }
    }

    pub fn to_credential_process(&self) -> CredentialProcessResponse {
        CredentialProcessResponse {
            version: 1,
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
            expiration: self.expiration,
        }
    }

    /// Environment variables understood by AWS SDKs and CLI
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        use secrecy::ExposeSecret;

        let mut vars = vec![
            ("AWS_ACCESS_KEY_ID", self.access_key_id.clone()),
            (
                "AWS_SECRET_ACCESS_KEY",
                self.secret_access_key.expose_secret().clone(),
            ),
            ("AWS_SESSION_TOKEN", self.session_token.clone()),
        ];
        if let Some(ref region) = self.region {
            vars.push(("AWS_REGION", region.clone()));
        }
        vars
    }
}

/// https://docs.aws.amazon.com/sdkref/latest/guide/feature-process-credentials.html
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialProcessResponse {
    pub version: i64,
    pub access_key_id: String,
    pub secret_access_key: crate::credentials::AwsSecretAccessKey,
    pub session_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<chrono::DateTime<chrono::Utc>>,
}
