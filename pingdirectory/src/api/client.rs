use rustls::pki_types::pem::PemObject;
use rustls::pki_types::CertificateDer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::common::{ApiErrorResponse, ConfigCategory};
use super::config_api::ConfigApi;
use super::error::ApiError;

const USER_AGENT: &str = concat!("terraform-provider-pingdirectory/", env!("CARGO_PKG_VERSION"));

/// PingDirectory Configuration API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    retry_config: RetryConfig,
}

#[derive(Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Skip server certificate verification
    pub insecure_trust_all_certs: bool,
    /// PEM bundles trusted in addition to the system roots
    pub ca_certificates: Vec<Vec<u8>>,
    pub retry: RetryConfig,
}

impl Client {
    /// Create a new API client with default options
    pub fn new(https_host: &str, username: &str, password: &str) -> Result<Self, ApiError> {
        Self::with_options(https_host, username, password, ClientOptions::default())
    }

    pub fn with_options(
        https_host: &str,
        username: &str,
        password: &str,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let host = url::Url::parse(https_host)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", https_host, e)))?;
        if !matches!(host.scheme(), "https" | "http") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be https",
                https_host
            )));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(options.insecure_trust_all_certs)
            .timeout(Duration::from_secs(options.retry.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30));

        for pem in &options.ca_certificates {
            for cert in parse_pem_certificates(pem)? {
                builder = builder.add_root_certificate(reqwest::Certificate::from_der(&cert)?);
            }
        }

        let base_url = format!("{}/config", host.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client: builder.build()?,
                base_url,
                username: username.to_string(),
                password: password.to_string(),
                retry_config: options.retry,
            }),
        })
    }

    /// `<https_host>/config`
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Operations on one configuration category
    pub fn config<C: ConfigCategory>(&self) -> ConfigApi<'_, C> {
        ConfigApi::new(self)
    }

    /// Execute a GET request with retry logic
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_with_retry(
            || async {
                let url = format!("{}{}", self.inner.base_url, path);

                tracing::debug!("GET request to: {}", url);

                self.inner
                    .http_client
                    .get(&url)
                    .basic_auth(&self.inner.username, Some(&self.inner.password))
                    .send()
                    .await
            },
            path,
            true,
        )
        .await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_query<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        if query.is_empty() {
            return self.get(path).await;
        }
        let query_string = query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.get(&format!("{}?{}", path, query_string)).await
    }

    /// Execute a POST request with retry logic
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_with_retry(
            || async {
                let url = format!("{}{}", self.inner.base_url, path);

                tracing::debug!("POST request to: {}", url);

                self.inner
                    .http_client
                    .post(&url)
                    .basic_auth(&self.inner.username, Some(&self.inner.password))
                    .json(body)
                    .send()
                    .await
            },
            path,
            false,
        )
        .await
    }

    /// Execute a PATCH request with retry logic
    pub async fn patch<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_with_retry(
            || async {
                let url = format!("{}{}", self.inner.base_url, path);

                tracing::debug!("PATCH request to: {}", url);

                self.inner
                    .http_client
                    .patch(&url)
                    .basic_auth(&self.inner.username, Some(&self.inner.password))
                    .json(body)
                    .send()
                    .await
            },
            path,
            false,
        )
        .await
    }

    /// Execute a DELETE request with retry logic
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute_with_retry(
            || async {
                let url = format!("{}{}", self.inner.base_url, path);

                tracing::debug!("DELETE request to: {}", url);

                self.inner
                    .http_client
                    .delete(&url)
                    .basic_auth(&self.inner.username, Some(&self.inner.password))
                    .send()
                    .await
            },
            path,
            true,
        )
        .await
    }

    /// Execute request with retry logic
    ///
    /// Requests that are not idempotent are only retried when the server
    /// certainly did not act on them: 429, or no connection was made.
    async fn execute_with_retry<F, Fut, T>(
        &self,
        request_fn: F,
        path: &str,
        idempotent: bool,
    ) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
        T: for<'de> Deserialize<'de>,
    {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.inner.retry_config.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    self.inner.retry_config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    self.inner.retry_config.max_backoff_ms,
                );
                tracing::warn!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff,
                    attempt
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match request_fn().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return self.parse_success_response(response).await;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(ApiError::AuthError);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ApiError::RateLimited);
                    } else if status.is_server_error() && idempotent {
                        last_error = Some(self.error_from_response(response).await);
                    } else {
                        return Err(self.error_from_response(response).await);
                    }
                }
                Err(e) => {
                    if e.is_timeout() && !idempotent {
                        return Err(ApiError::Timeout(self.inner.retry_config.timeout_seconds));
                    } else if e.is_timeout() {
                        last_error =
                            Some(ApiError::Timeout(self.inner.retry_config.timeout_seconds));
                    } else if e.is_connect() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    /// Parse successful response; an empty body reads as JSON null
    async fn parse_success_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        let parsed = if text.trim().is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_str::<T>(&text)
        };

        parsed.map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    async fn error_from_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let detail = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .and_then(|body| body.detail);

        ApiError::Status {
            status,
            message: text,
            detail,
        }
    }
}

/// Every certificate of a PEM bundle, as DER
fn parse_pem_certificates(pem: &[u8]) -> Result<Vec<Vec<u8>>, ApiError> {
    let certs = CertificateDer::pem_slice_iter(pem)
        .map(|cert| cert.map(|c| c.as_ref().to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::InvalidCertificate(e.to_string()))?;
    if certs.is_empty() {
        return Err(ApiError::InvalidCertificate(
            "no certificates found in PEM data".to_string(),
        ));
    }
    Ok(certs)
}
