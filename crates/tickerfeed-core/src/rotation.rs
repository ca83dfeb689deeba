//! Credential rotation with per-credential retry on minute throttles.
//!
//! For each credential in pool order the rotator waits on the rate gate,
//! issues the call and classifies the body:
//!
//! - transport failure, non-2xx status or unusable body: next credential
//! - parameter error: abort, no other credential would fare better
//! - minute throttle: back off and retry the same credential, up to
//!   `max_retries` times, then next credential
//! - daily cap: abort with a daily-limit error, unless rotation past daily
//!   caps is enabled
//! - success: return the body

use std::iter;
use std::sync::Arc;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::adapters::{alphavantage, marketaux};
use crate::classify::{classify, Classification};
use crate::credential::{Credential, CredentialPool};
use crate::error::{AttemptError, FetchError, ValidationError};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::retry::RetryConfig;
use crate::stats::FetchStats;
use crate::throttling::RateGate;

/// Top-level structure a successful body must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `Meta Data` object.
    PriceSeries,
    /// `data` array.
    NewsFeed,
}

impl PayloadShape {
    pub fn matches(self, body: &Value) -> bool {
        match self {
            Self::PriceSeries => alphavantage::has_expected_shape(body),
            Self::NewsFeed => marketaux::has_expected_shape(body),
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::PriceSeries => "'Meta Data' object",
            Self::NewsFeed => "'data' array",
        }
    }
}

/// One upstream call, credential excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    pub params: Vec<(&'static str, String)>,
    pub expects: PayloadShape,
}

enum CredentialOutcome {
    /// Stop the whole rotation with this error.
    Abort(FetchError),
    /// Move on to the next credential.
    Failed(AttemptError),
}

pub struct Rotator {
    name: &'static str,
    base_url: String,
    credential_param: &'static str,
    pool: CredentialPool,
    gate: RateGate,
    retry: RetryConfig,
    rotate_on_daily_cap: bool,
    timeout_ms: u64,
    http_client: Arc<dyn HttpClient>,
    stats: Arc<FetchStats>,
}

impl Rotator {
    pub fn new(
        name: &'static str,
        base_url: impl Into<String>,
        credential_param: &'static str,
        pool: CredentialPool,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            name,
            base_url: base_url.into(),
            credential_param,
            pool,
            gate: RateGate::default(),
            retry: RetryConfig::default(),
            rotate_on_daily_cap: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            http_client,
            stats: Arc::new(FetchStats::new()),
        }
    }

    pub fn with_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rotate_on_daily_cap(mut self, rotate: bool) -> Self {
        self.rotate_on_daily_cap = rotate;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_stats(mut self, stats: Arc<FetchStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Run `query` against the pool until one credential yields a usable body.
    pub async fn fetch_with_rotation(&self, query: &UpstreamQuery) -> Result<Value, FetchError> {
        let mut last_error = None;
        let mut daily_cap = None;

        for (index, credential) in self.pool.iter().enumerate() {
            if index > 0 {
                self.stats.record_rotation();
                info!(
                    upstream = self.name,
                    credential = %credential,
                    position = index,
                    "rotating to next credential"
                );
            }

            match self.try_credential(credential, query).await {
                Ok(body) => return Ok(body),
                Err(CredentialOutcome::Abort(error)) => return Err(error),
                Err(CredentialOutcome::Failed(error)) => {
                    if let AttemptError::DailyCap(message) = &error {
                        daily_cap = Some(message.clone());
                    }
                    last_error = Some(error);
                }
            }
        }

        let last_error = last_error.unwrap_or(AttemptError::NoCredentials {
            upstream: self.name,
        });
        warn!(upstream = self.name, error = %last_error, "all credentials exhausted");
        Err(FetchError::Exhausted {
            last_error,
            daily_cap,
        })
    }

    async fn try_credential(
        &self,
        credential: &Credential,
        query: &UpstreamQuery,
    ) -> Result<Value, CredentialOutcome> {
        let mut throttle_message = String::new();

        for attempt in 0..=self.retry.max_retries {
            self.gate.admit(credential).await;

            debug!(
                upstream = self.name,
                credential = %credential,
                attempt,
                url = %self.base_url,
                params = ?query.params,
                "calling upstream"
            );
            let request = HttpRequest::get(self.base_url.as_str())
                .with_query(
                    query
                        .params
                        .iter()
                        .map(|(name, value)| (*name, value.as_str()))
                        .chain(iter::once((self.credential_param, credential.expose()))),
                )
                .with_timeout_ms(self.timeout_ms);

            let response = match self.http_client.execute(request).await {
                Ok(response) => response,
                Err(error) => {
                    return Err(self.fail(credential, AttemptError::Transport(error.message().to_owned())));
                }
            };
            if !response.is_success() {
                return Err(self.fail(
                    credential,
                    AttemptError::Status {
                        status: response.status,
                    },
                ));
            }

            let body: Value = match serde_json::from_str(&response.body) {
                Ok(body) => body,
                Err(error) => {
                    return Err(self.fail(
                        credential,
                        AttemptError::UnexpectedPayload(format!("body is not JSON: {error}")),
                    ));
                }
            };

            match classify(&body) {
                Classification::Success if query.expects.matches(&body) => {
                    self.stats.record_success();
                    return Ok(body);
                }
                Classification::Success => {
                    return Err(self.fail(
                        credential,
                        AttemptError::UnexpectedPayload(format!(
                            "missing {}",
                            query.expects.marker()
                        )),
                    ));
                }
                Classification::ParamError(message) => {
                    self.stats.record_failure();
                    warn!(upstream = self.name, %message, "upstream rejected request parameters");
                    return Err(CredentialOutcome::Abort(FetchError::Parameter(
                        ValidationError::RejectedByUpstream { message },
                    )));
                }
                Classification::DailyCap(message) => {
                    self.stats.record_daily_cap();
                    warn!(
                        upstream = self.name,
                        credential = %credential,
                        %message,
                        "daily request limit reached"
                    );
                    if self.rotate_on_daily_cap {
                        return Err(CredentialOutcome::Failed(AttemptError::DailyCap(message)));
                    }
                    return Err(CredentialOutcome::Abort(FetchError::DailyCap { message }));
                }
                Classification::MinuteThrottle(message) => {
                    self.stats.record_throttled();
                    throttle_message = message;
                    if attempt < self.retry.max_retries {
                        let delay = self.retry.delay_for_attempt(attempt);
                        self.stats.record_backoff(delay);
                        info!(
                            upstream = self.name,
                            credential = %credential,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "minute throttle, backing off"
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        warn!(
            upstream = self.name,
            credential = %credential,
            "minute throttle persisted after retries"
        );
        Err(CredentialOutcome::Failed(AttemptError::Throttled(throttle_message)))
    }

    fn fail(&self, credential: &Credential, error: AttemptError) -> CredentialOutcome {
        self.stats.record_failure();
        warn!(upstream = self.name, credential = %credential, %error, "credential attempt failed");
        CredentialOutcome::Failed(error)
    }
}
