//! HTTP client for the EC2 instance metadata service (IMDS)

const TOKEN_PATH: &str = "latest/api/token";
const METADATA_PREFIX: &str = "latest/meta-data/";

const HEADER_TOKEN: &str = "x-aws-ec2-metadata-token";
const HEADER_TOKEN_TTL_SECONDS: &str = "x-aws-ec2-metadata-token-ttl-seconds";

/// Explicitly constructed client; nothing here is shared process-wide.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http_client: reqwest::Client,
    endpoint: url::Url,
    token_ttl_seconds: u32,
}

impl MetadataClient {
    pub fn new(config: &crate::config::Config) -> Result<Self, crate::error::Error> {
        // IMDS is link-local; it must never be reached through a proxy
        let http_client = reqwest::ClientBuilder::new()
            .no_proxy()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint().clone(),
            token_ttl_seconds: config.token_ttl_seconds(),
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// Request an IMDSv2 session token.
    pub async fn try_acquire_token(
        &self,
    ) -> Result<crate::credentials::MetadataToken, crate::error::Error> {
        let url = self.endpoint.join(TOKEN_PATH)?;
        let resp = self
            .http_client
            .put(url)
            .header(HEADER_TOKEN_TTL_SECONDS, self.token_ttl_seconds.to_string())
            .send()
            .await
            .map_err(|e| crate::error::Error::TokenUnavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(crate::error::Error::TokenUnavailable(format!(
                "token endpoint returned {status}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| crate::error::Error::TokenUnavailable(e.to_string()))?;
        let value = body.trim();
        if value.is_empty() {
            return Err(crate::error::Error::TokenUnavailable(
                "token endpoint returned an empty body".to_string(),
            ));
        }

        Ok(crate::credentials::MetadataToken::new(
            value.to_owned(),
            self.token_ttl_seconds,
        ))
    }

    /// Best-effort token acquisition. `None` means callers proceed with IMDSv1-style requests.
    pub async fn acquire_token(&self) -> Option<crate::credentials::MetadataToken> {
        match self.try_acquire_token().await {
            Ok(token) => {
                tracing::trace!(message = "Acquired IMDSv2 token", token = ?token);
                Some(token)
            }
            Err(e) => {
                tracing::debug!(message = "IMDSv2 token unavailable, falling back to requests without token", endpoint = %self.endpoint, error = %e);
                None
            }
        }
    }

    /// Read `latest/meta-data/{path}` as plain text.
    ///
    /// Leading `/` in `path` is ignored, so `"instance-id"` and `"/instance-id"` are the same.
    pub async fn get_metadata(
        &self,
        path: &str,
        token: Option<&crate::credentials::MetadataToken>,
    ) -> Result<String, crate::error::Error> {
        let path = path.trim_start_matches('/');
        let url = self.endpoint.join(&format!("{METADATA_PREFIX}{path}"))?;

        let mut req = self.http_client.get(url);
        if let Some(token) = token {
            use secrecy::ExposeSecret;
            req = req.header(HEADER_TOKEN, token.expose_secret().as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| crate::error::Error::metadata_unavailable(path, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(crate::error::Error::metadata_unavailable(
                path,
                format!("metadata service returned {status}"),
            ));
        }

        resp.text()
            .await
            .map_err(|e| crate::error::Error::metadata_unavailable(path, e))
    }
}
