//! Payloads served by the instance metadata service

/// AWS secret access key; `Debug` never prints the value.
pub struct AwsSecretAccessKey(secrecy::SecretString);

impl AwsSecretAccessKey {
    pub fn new(value: String) -> Self {
        Self(secrecy::SecretString::new(value))
    }

    pub fn is_empty(&self) -> bool {
        use secrecy::ExposeSecret;
        self.0.expose_secret().is_empty()
    }
}

impl Default for AwsSecretAccessKey {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl secrecy::ExposeSecret<String> for AwsSecretAccessKey {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

impl Clone for AwsSecretAccessKey {
    fn clone(&self) -> Self {
        use secrecy::ExposeSecret;
        Self::new(self.0.expose_secret().clone())
    }
}

impl std::fmt::Debug for AwsSecretAccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str("AwsSecretAccessKey([REDACTED])")
    }
}

impl serde::Serialize for AwsSecretAccessKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use secrecy::ExposeSecret;
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> serde::Deserialize<'de> for AwsSecretAccessKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub enum CredentialStatus {
    Success,
    /// Any `Code` other than `Success`
    #[serde(other)]
    Failed,
}

/// Response of `GET /latest/meta-data/iam/security-credentials/{role}`
///
/// https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/instance-metadata-security-credentials.html
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleCredentialSet {
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: AwsSecretAccessKey,
    #[serde(default, rename = "Token")]
    pub session_token: String,
    pub expiration: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "Code")]
    pub status: CredentialStatus,
    #[serde(rename = "Type")]
    pub role_type: Option<String>,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
    pub message: Option<String>,
}

impl RoleCredentialSet {
    /// Parse a credential payload served for `role`.
    ///
    /// Failed payloads usually come without keys and are accepted as such; a successful one must
    /// carry both `AccessKeyId` and `SecretAccessKey`.
    pub fn parse(role: &str, body: &str) -> Result<Self, crate::error::Error> {
        let creds: Self = serde_json::from_str(body).map_err(|e| {
            crate::error::Error::MalformedCredentialPayload {
                role: role.to_owned(),
                reason: e.to_string(),
            }
        })?;

        if creds.is_success()
            && (creds.access_key_id.is_empty() || creds.secret_access_key.is_empty())
        {
            return Err(crate::error::Error::MalformedCredentialPayload {
                role: role.to_owned(),
                reason: "Code is Success but AccessKeyId or SecretAccessKey is missing".to_string(),
            });
        }

        Ok(creds)
    }

    pub fn is_success(&self) -> bool {
        self.status == CredentialStatus::Success
    }
}

/// IMDSv2 session token
pub struct MetadataToken {
    value: secrecy::SecretString,
    ttl_seconds: u32,
    acquired_at: chrono::DateTime<chrono::Utc>,
}

impl MetadataToken {
    pub(crate) fn new(value: String, ttl_seconds: u32) -> Self {
        Self {
            value: secrecy::SecretString::new(value),
            ttl_seconds,
            acquired_at: chrono::Utc::now(),
        }
    }

    pub fn ttl_seconds(&self) -> u32 {
        self.ttl_seconds
    }

    pub fn expires_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.acquired_at + chrono::Duration::seconds(self.ttl_seconds.into())
    }
}

impl secrecy::ExposeSecret<String> for MetadataToken {
    fn expose_secret(&self) -> &String {
        self.value.expose_secret()
    }
}

impl std::fmt::Debug for MetadataToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("MetadataToken")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("acquired_at", &self.acquired_at)
            .finish_non_exhaustive()
    }
}
