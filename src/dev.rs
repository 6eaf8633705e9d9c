//! In-process IMDS stand-in for tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct MockImds {
    token: Option<String>,
    require_token: bool,
    delay: Option<std::time::Duration>,
    roles: Vec<String>,
    credentials: HashMap<String, String>,
    metadata: HashMap<String, String>,

    seen_tokens: Mutex<Vec<Option<String>>>,
    requested_token_ttls: Mutex<Vec<String>>,
}

#[derive(Default)]
pub(crate) struct MockImdsBuilder {
    inner: MockImds,
}

impl MockImds {
    pub(crate) fn builder() -> MockImdsBuilder {
        MockImdsBuilder::default()
    }

    pub(crate) async fn start(self) -> MockImdsServer {
        let imds = Arc::new(self);
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let app = axum::Router::new()
            .route("/latest/api/token", axum::routing::put(put_token))
            .route("/latest/meta-data/*path", axum::routing::get(get_metadata))
            .layer(axum::extract::Extension(imds.clone()));
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        let handle = tokio::spawn(async move {
            server.await.unwrap();
        });

        MockImdsServer { imds, addr, handle }
    }
}

impl MockImdsBuilder {
    /// Serve IMDSv2 tokens with this value. Without it the token endpoint answers 403.
    pub(crate) fn token(mut self, token: &str) -> Self {
        self.inner.token = Some(token.to_owned());
        self
    }

    /// Reject metadata reads without a token, like an instance with `HttpTokens=required`.
    pub(crate) fn require_token(mut self) -> Self {
        self.inner.require_token = true;
        self
    }

    /// Hold every response for `delay` before answering.
    pub(crate) fn delay(mut self, delay: std::time::Duration) -> Self {
        self.inner.delay = Some(delay);
        self
    }

    /// Attach a role serving `payload` as its credentials.
    pub(crate) fn role(mut self, name: &str, payload: &str) -> Self {
        self.inner.roles.push(name.to_owned());
        self.inner
            .credentials
            .insert(name.to_owned(), payload.to_owned());
        self
    }

    /// Attach a role whose credentials endpoint answers 404.
    pub(crate) fn role_without_credentials(mut self, name: &str) -> Self {
        self.inner.roles.push(name.to_owned());
        self
    }

    pub(crate) fn metadata(mut self, path: &str, value: &str) -> Self {
        self.inner
            .metadata
            .insert(path.to_owned(), value.to_owned());
        self
    }

    pub(crate) fn build(self) -> MockImds {
        self.inner
    }
}

pub(crate) struct MockImdsServer {
    imds: Arc<MockImds>,
    pub(crate) addr: std::net::SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl MockImdsServer {
    pub(crate) fn config(&self) -> crate::config::Config {
        self.config_with(|_| {})
    }

    pub(crate) fn config_with(
        &self,
        f: impl FnOnce(&mut crate::config::ConfigData),
    ) -> crate::config::Config {
        let mut data = crate::config::ConfigData {
            endpoint: Some(format!("http://{}", self.addr)),
            ..Default::default()
        };
        f(&mut data);
        crate::config::Config::new(data).unwrap()
    }

    pub(crate) fn client(&self) -> crate::client::MetadataClient {
        crate::client::MetadataClient::new(&self.config()).unwrap()
    }

    /// Token header of every metadata read, in order
    pub(crate) fn seen_tokens(&self) -> Vec<Option<String>> {
        self.imds.seen_tokens.lock().unwrap().clone()
    }

    /// Number of metadata reads served so far
    pub(crate) fn metadata_reads(&self) -> usize {
        self.imds.seen_tokens.lock().unwrap().len()
    }

    pub(crate) fn requested_token_ttls(&self) -> Vec<String> {
        self.imds.requested_token_ttls.lock().unwrap().clone()
    }
}

impl MockImds {
    async fn hold(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Drop for MockImdsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Client pointing at a local port nobody listens on.
pub(crate) fn unreachable_client() -> crate::client::MetadataClient {
    let addr = {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        listener.local_addr().unwrap()
    };
    let config = crate::config::Config::new(crate::config::ConfigData {
        endpoint: Some(format!("http://{addr}")),
        ..Default::default()
    })
    .unwrap();
    crate::client::MetadataClient::new(&config).unwrap()
}

async fn put_token(
    axum::extract::Extension(imds): axum::extract::Extension<Arc<MockImds>>,
    headers: axum::http::HeaderMap,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    if let Some(ttl) = headers
        .get("x-aws-ec2-metadata-token-ttl-seconds")
        .and_then(|v| v.to_str().ok())
    {
        imds.requested_token_ttls
            .lock()
            .unwrap()
            .push(ttl.to_owned());
    }
    imds.hold().await;

    match imds.token {
        Some(ref token) => (axum::http::StatusCode::OK, token.clone()).into_response(),
        None => axum::http::StatusCode::FORBIDDEN.into_response(),
    }
}

async fn get_metadata(
    axum::extract::Extension(imds): axum::extract::Extension<Arc<MockImds>>,
    headers: axum::http::HeaderMap,
    uri: axum::http::Uri,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    let given = headers
        .get("x-aws-ec2-metadata-token")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_owned());
    imds.seen_tokens.lock().unwrap().push(given.clone());
    imds.hold().await;

    let authorized = match (&imds.token, &given) {
        (_, None) => !imds.require_token,
        (Some(expected), Some(given)) => expected == given,
        (None, Some(_)) => false,
    };
    if !authorized {
        return axum::http::StatusCode::UNAUTHORIZED.into_response();
    }

    let path = uri.path().strip_prefix("/latest/meta-data/").unwrap_or("");

    if let Some(value) = imds.metadata.get(path) {
        return (axum::http::StatusCode::OK, value.clone()).into_response();
    }
    if path == "iam/security-credentials/" && !imds.roles.is_empty() {
        let mut body = imds.roles.join("\n");
        body.push('\n');
        return (axum::http::StatusCode::OK, body).into_response();
    }
    if let Some(role) = path.strip_prefix("iam/security-credentials/") {
        if let Some(payload) = imds.credentials.get(role) {
            return (axum::http::StatusCode::OK, payload.clone()).into_response();
        }
    }

    axum::http::StatusCode::NOT_FOUND.into_response()
}
