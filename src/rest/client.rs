//! Coinbase brokerage REST API client implementation.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::auth::{CredentialsProvider, FileCredentials, SigningKey, sign_request};
use crate::config::EnvConfig;
use crate::error::CoinbaseError;
use crate::rest::endpoints::COINBASE_BASE_URL;
use crate::rest::request::RequestDescriptor;
use crate::rest::retry::{RetryPolicy, Transition};
use crate::rest::traits::BrokerageClient;
use crate::rest::types::{
    Account, CurrencyBalance, HistoricalOrdersQuery, PriceBook, Product, TickerResponse,
    TransactionSummary,
};
use crate::types::{Order, OrderRequest, ProductType};

/// Per-attempt timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The Coinbase brokerage REST API client.
///
/// Every request is signed with a fresh ES256 token, validated against the
/// expected response type and retried with linear backoff on transient
/// failures.
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_brokerage_client::rest::CoinbaseRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseRestClient::builder()
///         .credentials_file("/path/to/cdp_api_key.json")
///         .build();
///
///     let accounts = client.get_accounts().await?;
///     println!("{} accounts", accounts.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinbaseRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<CredentialSource>,
    signing_key: Arc<OnceCell<SigningKey>>,
    retry_policy: RetryPolicy,
    timeout: Duration,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

#[derive(Clone)]
enum CredentialSource {
    Provider(Arc<dyn CredentialsProvider>),
    File(PathBuf),
}

impl CoinbaseRestClient {
    /// Create a client without credentials.
    ///
    /// Every brokerage endpoint is authenticated, so requests made with this
    /// client fail with [`CoinbaseError::MissingCredentials`]. Use
    /// [`CoinbaseRestClient::builder()`] to configure credentials.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> CoinbaseRestClientBuilder {
        CoinbaseRestClientBuilder::new()
    }

    /// Create a client reading credentials from the configured key file.
    pub fn from_env_config(config: &EnvConfig) -> Self {
        Self::builder()
            .credentials_file(config.credentials_path.clone())
            .build()
    }

    /// The retry policy applied to every request.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Run `request` until it succeeds or the retry policy gives up.
    pub async fn execute<T>(&self, request: &RequestDescriptor) -> Result<T, CoinbaseError>
    where
        T: DeserializeOwned,
    {
        let method = request.method.as_str();
        let url = format!("{}{}", self.base_url, request.target());

        let mut attempt = 1;
        loop {
            let outcome = self.attempt(request, &url).await;
            if let Err(error) = &outcome {
                log_failure(method, &url, error);
            }

            match self.retry_policy.transition(attempt, outcome, method, &url) {
                Transition::Done(value) => return Ok(value),
                Transition::Backoff {
                    next_attempt,
                    delay,
                } => {
                    tracing::debug!(
                        "retrying {method} {url} in {}ms (attempt {next_attempt})",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next_attempt;
                }
                Transition::Failed(error) => return Err(error),
            }
        }
    }

    /// Make one signed request and validate the response body.
    async fn attempt<T>(&self, request: &RequestDescriptor, url: &str) -> Result<T, CoinbaseError>
    where
        T: DeserializeOwned,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let host = api_host(&self.base_url)?;
        let token = sign_request(
            self.signing_key().await?,
            request.method.as_str(),
            &host,
            &request.path,
        )?;

        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token)
            .timeout(self.timeout);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CoinbaseError::Transport {
                method: request.method.to_string(),
                target: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| CoinbaseError::SchemaValidation {
            target: url.to_string(),
            source,
        })
    }

    /// Load the signing key on first use.
    async fn signing_key(&self) -> Result<&SigningKey, CoinbaseError> {
        self.signing_key
            .get_or_try_init(|| async {
                match &self.credentials {
                    None => Err(CoinbaseError::MissingCredentials),
                    Some(CredentialSource::Provider(provider)) => {
                        SigningKey::from_credentials(provider.get_credentials())
                    }
                    Some(CredentialSource::File(path)) => {
                        let file = FileCredentials::load(path).await?;
                        SigningKey::from_credentials(file.get_credentials())
                    }
                }
            })
            .await
    }
}

fn log_failure(method: &str, url: &str, error: &CoinbaseError) {
    match error {
        CoinbaseError::Transport { status, body, .. } => {
            tracing::error!("[HTTP] {method} {url} -> {status} {body}");
        }
        CoinbaseError::Http(_) | CoinbaseError::HttpMiddleware(_) => {
            tracing::error!("[HTTP] {method} {url} -> ERR {error}");
        }
        CoinbaseError::SchemaValidation { source, .. } => {
            tracing::error!("[HTTP] Response validation failed for {method} {url}: {source}");
        }
        other => tracing::error!("[HTTP] {method} {url} failed: {other}"),
    }
}

/// Host part of `base_url`, as used in the signed `uri` claim.
fn api_host(base_url: &str) -> Result<String, CoinbaseError> {
    let url = url::Url::parse(base_url)?;
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| CoinbaseError::InvalidValue(format!("base URL {base_url} has no host")))
}

impl Default for CoinbaseRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CoinbaseRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .field("retry_policy", &self.retry_policy)
            .field("timeout", &self.timeout)
            .field("rate_limited", &self.rate_limiter.is_some())
            .finish()
    }
}

/// Builder for [`CoinbaseRestClient`].
pub struct CoinbaseRestClientBuilder {
    base_url: String,
    credentials: Option<CredentialSource>,
    user_agent: Option<String>,
    max_attempts: u32,
    retry_base_delay: Duration,
    timeout: Duration,
    rate_limit: Option<NonZeroU32>,
}

impl CoinbaseRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: COINBASE_BASE_URL.to_string(),
            credentials: None,
            user_agent: None,
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: RetryPolicy::DEFAULT_BASE_DELAY,
            timeout: DEFAULT_TIMEOUT,
            rate_limit: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(CredentialSource::Provider(credentials));
        self
    }

    /// Read credentials from a JSON key file on first request.
    pub fn credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials = Some(CredentialSource::File(path.into()));
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the total number of attempts per request, the first one included
    /// (at least 1).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the backoff unit; attempt `n` waits `n * delay` before retrying.
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the timeout of a single attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Limit outgoing requests to `per_second` (retries included).
    pub fn rate_limit(mut self, per_second: NonZeroU32) -> Self {
        self.rate_limit = Some(per_second);
        self
    }

    /// Build the client.
    pub fn build(self) -> CoinbaseRestClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("coinbase-brokerage-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinbase-brokerage-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        CoinbaseRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
            signing_key: Arc::new(OnceCell::new()),
            retry_policy: RetryPolicy::new(self.max_attempts, self.retry_base_delay),
            timeout: self.timeout,
            rate_limiter: self
                .rate_limit
                .map(|per_second| Arc::new(RateLimiter::direct(Quota::per_second(per_second)))),
        }
    }
}

impl Default for CoinbaseRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// BrokerageClient trait implementation.

impl BrokerageClient for CoinbaseRestClient {
    // ========== Accounts ==========

    async fn get_accounts(&self) -> Result<Vec<Account>, CoinbaseError> {
        CoinbaseRestClient::get_accounts(self).await
    }

    async fn get_currency_account(
        &self,
        currency: &str,
        increment: &str,
    ) -> Result<CurrencyBalance, CoinbaseError> {
        CoinbaseRestClient::get_currency_account(self, currency, increment).await
    }

    // ========== Orders ==========

    async fn create_order(&self, order: &OrderRequest) -> Result<Uuid, CoinbaseError> {
        CoinbaseRestClient::create_order(self, order).await
    }

    async fn cancel_order(&self, order_id: Uuid) -> Result<(), CoinbaseError> {
        CoinbaseRestClient::cancel_order(self, order_id).await
    }

    async fn get_historical_orders(
        &self,
        query: &HistoricalOrdersQuery,
    ) -> Result<Vec<Order>, CoinbaseError> {
        CoinbaseRestClient::get_historical_orders(self, query).await
    }

    async fn get_open_orders(&self, product_id: Option<&str>) -> Result<Vec<Order>, CoinbaseError> {
        CoinbaseRestClient::get_open_orders(self, product_id).await
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Order, CoinbaseError> {
        CoinbaseRestClient::get_order(self, order_id).await
    }

    // ========== Market data ==========

    async fn get_product(&self, product_id: &str) -> Result<Product, CoinbaseError> {
        CoinbaseRestClient::get_product(self, product_id).await
    }

    async fn get_best_bid_ask(&self, product_id: &str) -> Result<PriceBook, CoinbaseError> {
        CoinbaseRestClient::get_best_bid_ask(self, product_id).await
    }

    async fn get_market_trades(
        &self,
        product_id: &str,
        limit: u32,
    ) -> Result<TickerResponse, CoinbaseError> {
        CoinbaseRestClient::get_market_trades(self, product_id, limit).await
    }

    async fn get_transaction_summary(
        &self,
        product_type: ProductType,
    ) -> Result<TransactionSummary, CoinbaseError> {
        CoinbaseRestClient::get_transaction_summary(self, product_type).await
    }
}
