//! Client layer: orchestrates signed transport calls and maps transport ↔ domain.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{
    AccountNumber, AccountSecret, AccountToken, ChunkSize, FlatRecord, JobStatus, Participant,
    ParticipantQuery, Program, ProgramId, UpsertJob, UpsertOutcome, ValidationError,
    flatten_participants,
};
use crate::transport::{Method, SignedRequest};

const DEFAULT_BASE_URL: &str = "https://theseus-api.signalvine.com";

/// Status polls made before giving up on an upsert.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 42;
/// Pause between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: Url,
    headers: Vec<(&'static str, String)>,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    reason: Option<String>,
    headers: Vec<(String, String)>,
    body: String,
}

impl HttpResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
            };
            let mut builder = self.client.request(method, request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_owned(), value.to_owned()))
                })
                .collect();
            let body = response.text().await?;
            // The status line's own reason phrase is not read; the standard
            // phrase for the code stands in for it.
            Ok(HttpResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_owned),
                headers,
                body,
            })
        })
    }
}

#[derive(Debug, Clone)]
/// Account credentials for SignalVine API calls.
///
/// The token and secret sign every request; the account number scopes the
/// account-level endpoints.
pub struct Credentials {
    account_number: AccountNumber,
    token: AccountToken,
    secret: AccountSecret,
}

impl Credentials {
    /// Validate all three parts. An empty secret is rejected here, before any
    /// request can be attempted.
    pub fn new(
        account_number: impl Into<String>,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_number: AccountNumber::new(account_number)?,
            token: AccountToken::new(token)?,
            secret: AccountSecret::new(secret)?,
        })
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn token(&self) -> &AccountToken {
        &self.token
    }

    fn sign(&self, method: Method, path: &str, body: &str) -> SignedRequest {
        SignedRequest::new(&self.token, &self.secret, method, path, body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How long [`SignalVineClient::upsert_participants`] waits for a job.
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SignalVineClient`].
///
/// Multi-step operations (pagination, upsert + polling) stop at the first
/// error; nothing gathered before it is returned.
pub enum SignalVineError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The server answered with a status other than the one the call expects.
    ///
    /// For reads the message is `API reason: <phrase>`, where the phrase is the
    /// standard one for the status code (empty for unregistered codes). For an
    /// upsert submission it is the raw response body.
    #[error("API error {status_code}: {message}")]
    Api { status_code: u16, message: String },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// A configured endpoint or a returned location is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`SignalVineClient`].
pub struct SignalVineClientBuilder {
    credentials: Credentials,
    base_url: String,
    poll_policy: PollPolicy,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SignalVineClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            poll_policy: PollPolicy::default(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API host (and optional path prefix) every endpoint is appended to.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    /// Set an HTTP client timeout applied to each request.
    ///
    /// Pagination and polling have no cancellation of their own; to bound a
    /// whole call, wrap its future in a timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<SignalVineClient, SignalVineError> {
        let base_url = self.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SignalVineError::Transport(Box::new(err)))?;

        Ok(SignalVineClient {
            credentials: self.credentials,
            base_url,
            poll_policy: self.poll_policy,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level SignalVine client.
///
/// Every call is signed afresh with the current time. Calls are strictly
/// sequential; the client holds no state between them.
pub struct SignalVineClient {
    credentials: Credentials,
    base_url: String,
    poll_policy: PollPolicy,
    http: Arc<dyn HttpTransport>,
}

impl SignalVineClient {
    /// Create a client against the production API host.
    ///
    /// For more customization, use [`SignalVineClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            poll_policy: PollPolicy::default(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    pub fn builder(credentials: Credentials) -> SignalVineClientBuilder {
        SignalVineClientBuilder::new(credentials)
    }

    /// List the account's programs.
    pub async fn get_programs(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<Program>, SignalVineError> {
        let url = self.endpoint(
            &format!(
                "/v1/accounts/{}/programs",
                self.credentials.account_number().as_str()
            ),
            crate::transport::encode_programs_query(include_inactive),
        )?;
        let body = self.get_ok(url).await?;
        crate::transport::decode_programs_json_response(&body)
            .map_err(|err| SignalVineError::Parse(Box::new(err)))
    }

    /// Fetch a program's profile field definitions as `field name -> type tag`.
    ///
    /// Pass the result to [`crate::convert_schema`] for normalized entries.
    pub async fn get_program_schema(
        &self,
        program: &ProgramId,
    ) -> Result<BTreeMap<String, String>, SignalVineError> {
        let url = self.endpoint(&format!("/v1/programs/{program}/profile"), Vec::new())?;
        let body = self.get_ok(url).await?;
        crate::transport::decode_program_schema_json_response(&body)
            .map_err(|err| SignalVineError::Parse(Box::new(err)))
    }

    /// Fetch one page of participants, unflattened.
    ///
    /// Paging only lines up when every page uses the same `chunk_size`.
    pub async fn get_participants_chunk(
        &self,
        program: &ProgramId,
        chunk_size: ChunkSize,
        offset: u64,
        include_inactive: bool,
    ) -> Result<Vec<Participant>, SignalVineError> {
        let url = self.endpoint(
            &format!("/v1/programs/{program}/participants"),
            crate::transport::encode_participants_query(chunk_size, offset, include_inactive),
        )?;
        let body = self.get_ok(url).await?;
        crate::transport::decode_participants_json_response(&body)
            .map_err(|err| SignalVineError::Parse(Box::new(err)))
    }

    /// Fetch every participant of a program, flattened.
    ///
    /// Pages are requested at offsets `0, n, 2n, ...` until the server returns
    /// an empty page. There is no offset cap: a server that never returns an
    /// empty page keeps this call running. Any failed page aborts the whole
    /// listing.
    pub async fn get_participants(
        &self,
        program: &ProgramId,
        query: ParticipantQuery,
    ) -> Result<Vec<FlatRecord>, SignalVineError> {
        let step = u64::from(query.chunk_size.value());
        let mut offset = 0_u64;
        let mut records = Vec::new();

        loop {
            debug!(%program, offset, count = step, "requesting participants page");
            let page = self
                .get_participants_chunk(program, query.chunk_size, offset, query.include_inactive)
                .await?;
            if page.is_empty() {
                debug!(%program, offset, "no more participants");
                break;
            }

            records.extend(flatten_participants(&page, query.include_aggregates));
            offset += step;
        }

        Ok(records)
    }

    /// Submit a bulk upsert and return the job's status location.
    ///
    /// The body is serialized once; the same bytes are signed and sent.
    pub async fn submit_upsert(&self, job: &UpsertJob) -> Result<Url, SignalVineError> {
        let url = self.endpoint(
            &format!("/v2/programs/{}/participants", job.program()),
            Vec::new(),
        )?;
        let body = crate::transport::build_upsert_body(job)
            .and_then(|body| body.to_json())
            .map_err(|err| SignalVineError::Encode(Box::new(err)))?;

        let response = self.execute(Method::Post, url.clone(), Some(body)).await?;
        if response.status != 202 {
            return Err(SignalVineError::Api {
                status_code: response.status,
                message: response.body,
            });
        }

        let location = response
            .header("location")
            .ok_or_else(|| SignalVineError::Api {
                status_code: response.status,
                message: "accepted upsert response has no Location header".to_owned(),
            })?;
        let location = url.join(location)?;
        info!(program = %job.program(), %location, "upsert accepted");
        Ok(location)
    }

    /// Read the status of an accepted bulk job once.
    pub async fn location_status(&self, location: &Url) -> Result<JobStatus, SignalVineError> {
        let body = self.get_ok(location.clone()).await?;
        crate::transport::decode_job_status_json_response(&body)
            .map_err(|err| SignalVineError::Parse(Box::new(err)))
    }

    /// Poll a job location until it completes or the poll budget runs out.
    pub async fn wait_for_job(&self, location: &Url) -> Result<UpsertOutcome, SignalVineError> {
        let PollPolicy {
            max_attempts,
            interval,
        } = self.poll_policy;
        let mut last = JobStatus::default();

        for attempt in 1..=max_attempts {
            let status = self.location_status(location).await?;
            debug!(attempt, complete = status.complete, "polled upsert status");

            if status.complete {
                let outcome = UpsertOutcome::from_complete(status);
                info!(attempt, ?outcome, "upsert finished");
                return Ok(outcome);
            }

            last = status;
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        warn!(attempts = max_attempts, %location, "upsert still incomplete after poll budget");
        Ok(UpsertOutcome::TimedOut {
            attempts: max_attempts,
            last,
        })
    }

    /// Submit a bulk upsert and wait for SignalVine to finish processing it.
    ///
    /// A job that completes with an error is an `Ok` outcome carrying the
    /// vendor's message; only HTTP-level failures are errors.
    pub async fn upsert_participants(
        &self,
        job: &UpsertJob,
    ) -> Result<UpsertOutcome, SignalVineError> {
        let location = self.submit_upsert(job).await?;
        self.wait_for_job(&location).await
    }

    fn endpoint(&self, path: &str, query: Vec<(String, String)>) -> Result<Url, SignalVineError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<HttpResponse, SignalVineError> {
        let signed = self
            .credentials
            .sign(method, url.path(), body.as_deref().unwrap_or_default());
        let request = HttpRequest {
            method,
            url,
            headers: signed.headers(),
            body,
        };
        self.http
            .send(request)
            .await
            .map_err(SignalVineError::Transport)
    }

    async fn get_ok(&self, url: Url) -> Result<String, SignalVineError> {
        let response = self.execute(Method::Get, url, None).await?;
        if response.status != 200 {
            return Err(SignalVineError::Api {
                status_code: response.status,
                message: format!("API reason: {}", response.reason.unwrap_or_default()),
            });
        }
        Ok(response.body)
    }
}
