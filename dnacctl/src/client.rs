//! HTTP client for communicating with the controller REST API.

use async_trait::async_trait;
use dnac_core::api::{paths, ApiEnvelope, AuthResponse, DeviceCommandResult, AUTH_TOKEN_HEADER};
use dnac_core::{
    CommandBatch, Credentials, Device, DnacError, Interface, Result, Task, TaskHandle, Token,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::poller::TaskSource;

/// Turn a configured host into a base URL.
///
/// A bare host name implies HTTPS; an explicit scheme is kept. Trailing
/// slashes are removed.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// Why a single request did not yield the expected payload
#[derive(Debug, Error)]
enum RequestFailure {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Send a request and decode its JSON body.
///
/// `expected` pins an exact status; `None` accepts any 2xx.
async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    expected: Option<StatusCode>,
) -> std::result::Result<T, RequestFailure> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    let accepted = match expected {
        Some(expected) => status == expected,
        None => status.is_success(),
    };
    if !accepted {
        return Err(RequestFailure::Status { status, body });
    }

    serde_json::from_str(&body).map_err(|e| RequestFailure::Decode(e.to_string()))
}

fn build_http_client(timeout_secs: u64, verify_tls: bool) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("dnacctl/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|e| DnacError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Exchange credentials for a bearer token.
///
/// `POST /dna/system/api/v1/auth/token` with HTTP basic auth. No retry.
pub async fn authenticate(
    http: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<Token> {
    let url = format!("{}{}", base_url, paths::AUTH_TOKEN);
    debug!("POST {}", url);

    let request = http
        .post(&url)
        .basic_auth(&credentials.username, Some(&credentials.password));

    match send_json::<AuthResponse>(request, None).await {
        Ok(auth) => {
            info!("Token retrieved for user {}", credentials.username);
            Ok(Token::new(auth.token))
        }
        Err(failure) => Err(DnacError::Auth(failure.to_string())),
    }
}

/// HTTP client bound to one controller and one bearer token.
///
/// Every call is a single request; nothing is retried or cached. Read
/// listings treat a non-2xx answer as "no entries" and only fail on
/// transport or decoding errors.
///
/// # Examples
///
/// ```no_run
/// use dnacctl::client::DnacClient;
/// use dnac_core::Credentials;
///
/// # async fn example() -> dnac_core::Result<()> {
/// let credentials = Credentials::new("devnetuser", "Cisco123!");
/// let client = DnacClient::with_config("sandboxdnac.cisco.com", 30, true, &credentials).await?;
///
/// for device in client.list_devices().await? {
///     println!("{:?}", device.hostname);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DnacClient {
    http: Client,
    base_url: String,
    token: Token,
}

impl DnacClient {
    /// Build the HTTP client and authenticate.
    ///
    /// # Arguments
    ///
    /// * `host` - Controller host name, or a full `http(s)://` base URL
    /// * `timeout_secs` - Per-request timeout in seconds
    /// * `verify_tls` - Verify the controller's TLS certificate
    /// * `credentials` - Username and password for the token exchange
    ///
    /// # Errors
    ///
    /// Returns [`DnacError::Config`] if the HTTP client cannot be created and
    /// [`DnacError::Auth`] if the token exchange fails.
    pub async fn with_config(
        host: &str,
        timeout_secs: u64,
        verify_tls: bool,
        credentials: &Credentials,
    ) -> Result<Self> {
        let base_url = normalize_host(host);
        let http = Self::http_for(&base_url, timeout_secs, verify_tls)?;
        let token = authenticate(&http, &base_url, credentials).await?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Build a client around an existing token, without contacting the controller
    pub fn with_token(
        host: &str,
        timeout_secs: u64,
        verify_tls: bool,
        token: Token,
    ) -> Result<Self> {
        let base_url = normalize_host(host);
        let http = Self::http_for(&base_url, timeout_secs, verify_tls)?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn http_for(base_url: &str, timeout_secs: u64, verify_tls: bool) -> Result<Client> {
        if !verify_tls {
            warn!(
                "TLS certificate verification is disabled for {}; the controller's identity is not checked",
                base_url
            );
        }
        build_http_client(timeout_secs, verify_tls)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        self.http
            .get(url)
            .header(AUTH_TOKEN_HEADER, self.token.as_str())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        self.http
            .post(url)
            .header(AUTH_TOKEN_HEADER, self.token.as_str())
    }

    /// Fetch a `{"response": [...]}` listing, soft-failing on non-2xx
    async fn soft_listing<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Vec<T>> {
        match send_json::<ApiEnvelope<Vec<T>>>(request, None).await {
            Ok(envelope) => {
                debug!("{} returned {} entries", endpoint, envelope.response.len());
                Ok(envelope.response)
            }
            Err(RequestFailure::Status { status, body }) => {
                warn!(
                    "Listing {} failed with HTTP {}, returning no entries: {}",
                    endpoint, status, body
                );
                Ok(Vec::new())
            }
            Err(failure) => Err(DnacError::Query {
                endpoint: endpoint.to_string(),
                reason: failure.to_string(),
            }),
        }
    }

    /// Retrieve every managed device (single, unpaginated request).
    ///
    /// A non-2xx answer yields an empty list.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        self.soft_listing(self.get(paths::NETWORK_DEVICES), paths::NETWORK_DEVICES)
            .await
    }

    /// Look a device up by its management IP address
    pub async fn find_device_by_ip(&self, ip: &str) -> Result<Device> {
        let ip = ip.trim();
        self.list_devices()
            .await?
            .into_iter()
            .find(|d| d.management_ip_address.as_deref() == Some(ip))
            .ok_or_else(|| DnacError::DeviceNotFound(ip.to_string()))
    }

    /// Retrieve the interfaces of one device.
    ///
    /// A non-2xx answer yields an empty list.
    pub async fn list_interfaces(&self, device_id: &str) -> Result<Vec<Interface>> {
        let request = self
            .get(paths::INTERFACES)
            .query(&[("deviceId", device_id)]);
        self.soft_listing(request, paths::INTERFACES).await
    }

    /// Retrieve the keywords the controller accepts as read-only commands.
    ///
    /// A non-2xx answer yields an empty list.
    pub async fn list_read_only_commands(&self) -> Result<Vec<String>> {
        self.soft_listing(self.get(paths::LEGIT_READS), paths::LEGIT_READS)
            .await
    }

    /// Submit a command batch; the controller must answer `202 Accepted`.
    ///
    /// # Errors
    ///
    /// Any other status, a transport failure or an undecodable body is a
    /// [`DnacError::Dispatch`]. The caller must not poll in that case.
    pub async fn submit(&self, batch: &CommandBatch) -> Result<TaskHandle> {
        let request = self.post(paths::READ_REQUEST).json(batch);

        match send_json::<ApiEnvelope<TaskHandle>>(request, Some(StatusCode::ACCEPTED)).await {
            Ok(envelope) => {
                info!(
                    "Launched {:?} on {} device(s) as task {}",
                    batch.commands(),
                    batch.device_uuids().len(),
                    envelope.response.task_id
                );
                Ok(envelope.response)
            }
            Err(failure) => Err(DnacError::Dispatch(format!(
                "batch '{}' was not accepted: {}",
                batch.name(),
                failure
            ))),
        }
    }

    /// Retrieve one status snapshot of a task
    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let path = paths::task(task_id);

        send_json::<ApiEnvelope<Task>>(self.get(&path), None)
            .await
            .map(|envelope| envelope.response)
            .map_err(|failure| DnacError::Query {
                endpoint: path,
                reason: failure.to_string(),
            })
    }

    /// Retrieve a command-runner result file
    pub async fn fetch_result(&self, file_id: &str) -> Result<Vec<DeviceCommandResult>> {
        let path = paths::file(file_id);

        match send_json::<Vec<DeviceCommandResult>>(self.get(&path), None).await {
            Ok(results) => {
                info!(
                    "Fetched result file {} ({} device entries)",
                    file_id,
                    results.len()
                );
                Ok(results)
            }
            Err(failure) => Err(DnacError::Fetch {
                file_id: file_id.to_string(),
                reason: failure.to_string(),
            }),
        }
    }
}

#[async_trait]
impl TaskSource for DnacClient {
    async fn task(&self, task_id: &str) -> Result<Task> {
        self.get_task(task_id).await
    }
}
