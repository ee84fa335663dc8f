//! Asynchronous management API client implementation.

use crate::models::QueueListQuery;
use crate::Result;
use rabbitmq_mgmt_core::client::{ClientConfig, RetryPolicy, MGMT_CONNECT_TIMEOUT};
use rabbitmq_mgmt_core::config::ManagementConfig;
use rabbitmq_mgmt_core::path::encode_segment;
use rabbitmq_mgmt_core::Error;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("rabbitmq-mgmt/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ManagementClient`].
#[derive(Debug, Clone)]
pub struct ManagementClientBuilder {
    config: ManagementConfig,
    http_config: ClientConfig,
}

impl ManagementClientBuilder {
    /// Create a new builder from a [`ManagementConfig`].
    #[must_use]
    pub fn new(config: ManagementConfig) -> Self {
        let retry_policy = if config.max_retries > 0 {
            RetryPolicy::enabled().with_max_retries(config.max_retries)
        } else {
            RetryPolicy::no_retry()
        };

        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_retry_policy(retry_policy);

        Self {
            config,
            http_config,
        }
    }

    /// Override the HTTP client configuration used when building the client.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Finalise the builder and create the [`ManagementClient`].
    pub fn build(self) -> Result<ManagementClient> {
        let api_root = self.config.parse_api_root()?;

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.http_config.timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression)
            .connect_timeout(Duration::from_secs(MGMT_CONNECT_TIMEOUT));

        if !self.config.tls_verify {
            warn!("TLS verification disabled for management client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.config.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(ManagementClient {
            http,
            api_root,
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            retry_policy: self.http_config.retry_policy,
            log_requests: self.http_config.enable_logging,
        })
    }
}

/// Asynchronous client for the RabbitMQ HTTP Management API.
///
/// Every method is a stateless pass-through: path parameters are
/// percent-encoded, a single request is sent against the `/api/` root, and
/// the server's JSON response is returned unchanged.
#[derive(Clone)]
pub struct ManagementClient {
    http: Client,
    api_root: Url,
    username: String,
    password: SecretString,
    retry_policy: RetryPolicy,
    log_requests: bool,
}

impl ManagementClient {
    /// Construct a client directly from the configuration.
    pub fn from_config(config: &ManagementConfig) -> Result<Self> {
        ManagementClientBuilder::new(config.clone()).build()
    }

    /// Construct a client for the given endpoint with guest credentials.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::from_config(&ManagementConfig::new(endpoint)?)
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ManagementConfig) -> ManagementClientBuilder {
        ManagementClientBuilder::new(config)
    }

    /// Return the `/api/` root all operations resolve against.
    #[must_use]
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    // Cluster

    /// Various bits of overview information about the cluster.
    pub async fn overview(&self) -> Result<Value> {
        self.get("overview").await
    }

    /// Extensions to the management plugin.
    pub async fn extensions(&self) -> Result<Value> {
        self.get("extensions").await
    }

    /// List cluster nodes.
    pub async fn nodes(&self) -> Result<Value> {
        self.get("nodes").await
    }

    /// Fetch a single cluster node by name.
    pub async fn node(&self, name: &str) -> Result<Value> {
        let path = format!("nodes/{}", encode_segment(name));
        self.get(&path).await
    }

    /// The user that authenticated this request.
    pub async fn whoami(&self) -> Result<Value> {
        self.get("whoami").await
    }

    // Connections and channels

    /// List open connections.
    pub async fn connections(&self) -> Result<Value> {
        self.get("connections").await
    }

    /// Fetch a single connection by name.
    pub async fn connection(&self, name: &str) -> Result<Value> {
        let path = format!("connections/{}", encode_segment(name));
        self.get(&path).await
    }

    /// Force-close a connection.
    pub async fn delete_connection(&self, name: &str) -> Result<()> {
        let path = format!("connections/{}", encode_segment(name));
        self.delete(&path).await
    }

    /// List channels on a connection.
    pub async fn connection_channels(&self, name: &str) -> Result<Value> {
        let path = format!("connections/{}/channels", encode_segment(name));
        self.get(&path).await
    }

    /// List open channels.
    pub async fn channels(&self) -> Result<Value> {
        self.get("channels").await
    }

    /// Fetch a single channel by name.
    pub async fn channel(&self, name: &str) -> Result<Value> {
        let path = format!("channels/{}", encode_segment(name));
        self.get(&path).await
    }

    // Consumers

    /// List consumers across all vhosts.
    pub async fn consumers(&self) -> Result<Value> {
        self.get("consumers").await
    }

    /// List consumers in a vhost.
    pub async fn vhost_consumers(&self, vhost: &str) -> Result<Value> {
        let path = format!("consumers/{}", encode_segment(vhost));
        self.get(&path).await
    }

    // Queues

    /// List queues across all vhosts.
    pub async fn queues(&self) -> Result<Value> {
        self.get("queues").await
    }

    /// List queues in a vhost, with optional filter and pagination options.
    pub async fn vhost_queues(&self, vhost: &str, query: &QueueListQuery) -> Result<Value> {
        let path = format!("queues/{}", encode_segment(vhost));
        self.get_with(&path, &query.to_pairs()).await
    }

    /// Fetch a single queue.
    pub async fn vhost_queue(&self, vhost: &str, name: &str) -> Result<Value> {
        let path = format!("queues/{}/{}", encode_segment(vhost), encode_segment(name));
        self.get(&path).await
    }

    /// Create or update a queue.
    pub async fn put_vhost_queue<B>(&self, vhost: &str, name: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let path = format!("queues/{}/{}", encode_segment(vhost), encode_segment(name));
        self.put(&path, body).await
    }

    /// Delete a queue.
    pub async fn delete_vhost_queue(&self, vhost: &str, name: &str) -> Result<()> {
        let path = format!("queues/{}/{}", encode_segment(vhost), encode_segment(name));
        self.delete(&path).await
    }

    /// Purge all messages from a queue.
    pub async fn purge_vhost_queue(&self, vhost: &str, name: &str) -> Result<()> {
        let path = format!(
            "queues/{}/{}/contents",
            encode_segment(vhost),
            encode_segment(name)
        );
        self.delete(&path).await
    }

    // Bindings

    /// List bindings across all vhosts.
    pub async fn bindings(&self) -> Result<Value> {
        self.get("bindings").await
    }

    /// List bindings in a vhost.
    pub async fn vhost_bindings(&self, vhost: &str) -> Result<Value> {
        let path = format!("bindings/{}", encode_segment(vhost));
        self.get(&path).await
    }

    // Exchanges

    /// List exchanges across all vhosts.
    pub async fn exchanges(&self) -> Result<Value> {
        self.get("exchanges").await
    }

    /// List exchanges in a vhost.
    pub async fn vhost_exchanges(&self, vhost: &str) -> Result<Value> {
        let path = format!("exchanges/{}", encode_segment(vhost));
        self.get(&path).await
    }

    /// Fetch a single exchange.
    pub async fn vhost_exchange(&self, vhost: &str, name: &str) -> Result<Value> {
        let path = format!(
            "exchanges/{}/{}",
            encode_segment(vhost),
            encode_segment(name)
        );
        self.get(&path).await
    }

    /// Create or update an exchange.
    pub async fn put_vhost_exchange<B>(&self, vhost: &str, name: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let path = format!(
            "exchanges/{}/{}",
            encode_segment(vhost),
            encode_segment(name)
        );
        self.put(&path, body).await
    }

    /// Delete an exchange.
    pub async fn delete_vhost_exchange(&self, vhost: &str, name: &str) -> Result<()> {
        let path = format!(
            "exchanges/{}/{}",
            encode_segment(vhost),
            encode_segment(name)
        );
        self.delete(&path).await
    }

    // Vhosts

    /// List vhosts.
    pub async fn vhosts(&self) -> Result<Value> {
        self.get("vhosts").await
    }

    /// Fetch a single vhost by name.
    pub async fn vhost(&self, name: &str) -> Result<Value> {
        let path = format!("vhosts/{}", encode_segment(name));
        self.get(&path).await
    }

    /// Create or update a vhost.
    pub async fn put_vhost<B>(&self, name: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let path = format!("vhosts/{}", encode_segment(name));
        self.put(&path, body).await
    }

    /// Delete a vhost.
    pub async fn delete_vhost(&self, name: &str) -> Result<()> {
        let path = format!("vhosts/{}", encode_segment(name));
        self.delete(&path).await
    }

    // Users and permissions

    /// List users.
    pub async fn users(&self) -> Result<Value> {
        self.get("users").await
    }

    /// Fetch a single user by name.
    pub async fn user(&self, name: &str) -> Result<Value> {
        let path = format!("users/{}", encode_segment(name));
        self.get(&path).await
    }

    /// Create or update a user.
    pub async fn put_user<B>(&self, name: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let path = format!("users/{}", encode_segment(name));
        self.put(&path, body).await
    }

    /// Delete a user.
    pub async fn delete_user(&self, name: &str) -> Result<()> {
        let path = format!("users/{}", encode_segment(name));
        self.delete(&path).await
    }

    /// List the permissions a user holds across vhosts.
    pub async fn user_permissions(&self, name: &str) -> Result<Value> {
        let path = format!("users/{}/permissions", encode_segment(name));
        self.get(&path).await
    }

    /// Set a user's permissions on a vhost.
    pub async fn put_permissions<B>(&self, vhost: &str, user: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let path = format!(
            "permissions/{}/{}",
            encode_segment(vhost),
            encode_segment(user)
        );
        self.put(&path, body).await
    }

    // Policies

    /// List policies.
    pub async fn policies(&self) -> Result<Value> {
        self.get("policies").await
    }

    // Request plumbing

    fn build_url(&self, path: &str) -> Result<Url> {
        self.api_root
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{path}`: {err}")))
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.get_with(path, &[]).await
    }

    async fn get_with(&self, path: &str, params: &[(&'static str, String)]) -> Result<Value> {
        let response = self.execute(Method::GET, path, params, None).await?;
        response.json::<Value>().await.map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })
    }

    async fn put<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        // Serialized up front so the request can be rebuilt on retry.
        let payload = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, &[], Some(&payload))
            .await
            .map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let mut attempt = 0;
        let mut last_error: Option<Error> = None;

        loop {
            let url = self.build_url(path)?;
            let mut request = self
                .http
                .request(method.clone(), url)
                .header("Accept", "application/json")
                .basic_auth(&self.username, Some(self.password.expose_secret()));

            if !params.is_empty() {
                request = request.query(&params);
            }

            if let Some(payload) = body {
                request = request.json(payload);
            }

            if self.log_requests {
                debug!(%method, path, attempt, "sending management request");
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    // Only 5xx/429 statuses are worth retrying; any other
                    // status is a definitive answer from the server.
                    let error = map_status_to_error(status, message);
                    if !matches!(error, Error::ServiceUnavailable(_)) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(err) => {
                    let error = Error::from(err);
                    if !error.is_transient() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }

            attempt += 1;
            if attempt > self.retry_policy.max_retries {
                break;
            }

            let delay = self.retry_policy.delay_for_attempt(attempt);
            if delay > Duration::from_millis(0) {
                debug!("retrying management request after {:?}", delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::ServiceUnavailable("Management request failed after retries".to_string())
        }))
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::AuthFailed(text),
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Management API temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Management API server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("Management API error {status}: {text}")),
    }
}
