pub const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";
pub const DEFAULT_TOKEN_TTL_SECONDS: u32 = 21600;
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(200);
pub const DEFAULT_READ_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(1500);

/// IMDSv2 tokens are accepted for at most 6 hours.
const MAX_TOKEN_TTL_SECONDS: u32 = 21600;

#[derive(Debug, Clone)]
pub struct Config {
    endpoint: url::Url,
    inner: ConfigData,
}

impl Config {
    pub fn new(inner: ConfigData) -> Result<Self, crate::error::Error> {
        let endpoint = base_url(inner.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        if let Some(ttl) = inner.token_ttl_seconds {
            if ttl == 0 || ttl > MAX_TOKEN_TTL_SECONDS {
                return Err(crate::error::Error::ConfigError(format!(
                    "token ttl (--token-ttl-seconds) must be within 1..={MAX_TOKEN_TTL_SECONDS}"
                )));
            }
        }
        if inner.connect_timeout_ms == Some(0) || inner.read_timeout_ms == Some(0) {
            return Err(crate::error::Error::ConfigError(
                "timeouts must not be zero".to_string(),
            ));
        }

        Ok(Self { endpoint, inner })
    }

    pub fn into_inner(self) -> ConfigData {
        self.inner
    }

    /// Origin of the metadata service, always ending with `/`
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    pub fn token_ttl_seconds(&self) -> u32 {
        self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS)
    }

    pub fn connect_timeout(&self) -> std::time::Duration {
        self.connect_timeout_ms
            .map(std::time::Duration::from_millis)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn read_timeout(&self) -> std::time::Duration {
        self.read_timeout_ms
            .map(std::time::Duration::from_millis)
            .unwrap_or(DEFAULT_READ_TIMEOUT)
    }
}

impl std::ops::Deref for Config {
    type Target = ConfigData;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ConfigData {
    pub endpoint: Option<String>,
    pub token_ttl_seconds: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
}

fn base_url(u: &str) -> Result<url::Url, crate::error::Error> {
    let url = reqwest::Url::parse(u).map_err(|_| {
        crate::error::Error::ConfigError("metadata endpoint (--endpoint) is malformed".to_string())
    })?;

    match url.origin() {
        url::Origin::Opaque(_) => Err(crate::error::Error::ConfigError(
            "metadata endpoint (--endpoint) is malformed".to_string(),
        )),
        url::Origin::Tuple(scheme, host, port) => {
            let mut base_url = reqwest::Url::parse(&format!("{scheme}://{host}"))?;
            match base_url.port_or_known_default() {
                Some(known) if known == port => {}
                _ => {
                    base_url.set_port(Some(port)).map_err(|_| {
                        crate::error::Error::ConfigError(
                            "metadata endpoint (--endpoint) cannot carry a port".to_string(),
                        )
                    })?;
                }
            };
            Ok(base_url)
        }
    }
}

/// Region from `$AWS_REGION` or `$AWS_DEFAULT_REGION`; empty values are ignored.
pub fn default_region() -> Option<String> {
    default_region_from(|name| std::env::var(name).ok())
}

fn default_region_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["AWS_REGION", "AWS_DEFAULT_REGION"]
        .into_iter()
        .filter_map(lookup)
        .find(|r| !r.is_empty())
}
