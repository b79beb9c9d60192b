//! HTTP client for the scan-analysis backend.

use std::marker::PhantomData;
use std::path::Path;

use async_trait::async_trait;
use neuroscan_core::{JobId, OwnerId};
use neuroscan_poller::{AsyncJobPoller, JobStatus, PollConfig, StatusSource};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::envelope::ApiEnvelope;
use crate::error::ApiError;
use crate::model::{ScanJob, guess_mime};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the scan backend.
///
/// `T` is the shape of a completed job's `result`. It defaults to raw JSON;
/// pick a concrete type when the caller knows the analysis payload.
///
/// Cloning is cheap: clones share the connection pool and [`Credentials`].
pub struct ScanApiClient<T = serde_json::Value> {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    _result: PhantomData<fn() -> T>,
}

impl<T> Clone for ScanApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: self.credentials.clone(),
            _result: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ScanApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanApiClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl<T> ScanApiClient<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
            _result: PhantomData,
        })
    }

    /// Client authenticated with the token in `config`.
    ///
    /// Fails with [`ApiError::Config`] when no token is configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let token = config.require_token()?;
        Self::new(config, Credentials::new(token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// A poller that uses this client as its status source.
    pub fn poller(&self, config: PollConfig) -> AsyncJobPoller<Self> {
        AsyncJobPoller::new(self.clone(), config)
    }

    /// Upload a scan from disk (`POST /upload`).
    pub async fn submit_file(
        &self,
        path: &Path,
        owner: Option<&OwnerId>,
    ) -> Result<ScanJob<T>, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Io(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("scan")
            .to_string();
        self.submit_bytes(&file_name, bytes, owner).await
    }

    /// Upload an in-memory scan (`POST /upload`, multipart `file` part).
    pub async fn submit_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        owner: Option<&OwnerId>,
    ) -> Result<ScanJob<T>, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(guess_mime(file_name))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut req = self.request(Method::POST, "upload").await?.multipart(form);
        if let Some(owner) = owner {
            req = req.query(&[("ownerId", owner.as_str())]);
        }

        let job: ScanJob<T> = read_envelope(req.send().await?).await?;
        tracing::info!(job_id = %job.id, file_name, "scan submitted");
        Ok(job)
    }

    /// Fetch the full job record (`GET /{id}`).
    pub async fn fetch_job(&self, job_id: &JobId) -> Result<ScanJob<T>, ApiError> {
        let req = self.request(Method::GET, job_id.as_str()).await?;
        read_envelope(req.send().await?).await
    }

    /// Fetch a job and interpret its status.
    pub async fn job_status(&self, job_id: &JobId) -> Result<JobStatus<T>, ApiError> {
        self.fetch_job(job_id).await?.status()
    }

    /// List every job belonging to `owner` (`GET /owner/{ownerId}`).
    pub async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<ScanJob<T>>, ApiError> {
        let req = self
            .request(Method::GET, &format!("owner/{}", owner.as_str()))
            .await?;
        read_envelope(req.send().await?).await
    }

    /// Delete a job (`DELETE /{id}`).
    pub async fn delete_job(&self, job_id: &JobId) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, job_id.as_str()).await?;
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let envelope: ApiEnvelope<serde_json::Value> = decode_body(resp).await?;
        envelope.into_unit(status)?;
        tracing::info!(job_id = %job_id, "job deleted");
        Ok(())
    }

    /// Authenticated request to `{base_url}/{path}` tagged with a fresh request id.
    ///
    /// Fails before any I/O when no token is available.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.credentials.bearer().await?;
        let url = format!("{}/{}", self.base_url, path);
        let request_id = Uuid::now_v7();

        tracing::debug!(%request_id, %method, %url, "backend request");

        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, request_id.to_string()))
    }
}

#[async_trait]
impl<T> StatusSource<T> for ScanApiClient<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Error = ApiError;

    async fn fetch_status(&self, job_id: &JobId) -> Result<JobStatus<T>, ApiError> {
        self.job_status(job_id).await
    }
}

async fn read_envelope<D: DeserializeOwned>(resp: Response) -> Result<D, ApiError> {
    let status = resp.status().as_u16();
    let envelope: ApiEnvelope<D> = decode_body(resp).await?;
    envelope.into_data(status)
}

/// Decode a response body as an envelope.
///
/// A non-2xx response whose body is not an envelope (proxy error page, empty
/// body) becomes [`ApiError::Api`] carrying the raw text.
async fn decode_body<D: DeserializeOwned>(resp: Response) -> Result<ApiEnvelope<D>, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    match serde_json::from_slice::<ApiEnvelope<D>>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(ApiError::api(
            status.as_u16(),
            String::from_utf8_lossy(&body).trim().to_string(),
        )),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}
