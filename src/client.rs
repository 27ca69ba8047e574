//! GraphQL transport: the executor capability and its HTTP implementation.
//!
//! [`GraphqlClient`] posts queries to a fixed endpoint with a fixed
//! credential and hands back the parsed JSON body, whatever its shape.
//! It does not retry, does not inspect GraphQL-level `errors` payloads, and
//! maps every failure to a typed [`ExtractError`].
//!
//! The [`GraphqlExecutor`] trait is the seam the traversal engine depends
//! on, so traversal logic can be exercised against a scripted executor
//! without a network.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::Config;
use crate::types::{
    operations, AuthErrorKind, ErrorContext, ExtractError, NetworkErrorKind, ValidationErrorKind,
};

// HTTP status code constants
const HTTP_UNAUTHORIZED: u16 = 401;
const HTTP_FORBIDDEN: u16 = 403;
const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Capability of executing a GraphQL query and returning the parsed response.
///
/// Implemented over HTTP by [`GraphqlClient`]; tests implement it with
/// scripted responses.
#[async_trait]
pub trait GraphqlExecutor {
    /// Executes `query` with the given `variables` and returns the full
    /// deserialized response body.
    ///
    /// No shape checking happens at this layer: whatever JSON the endpoint
    /// returns (including GraphQL `errors` payloads) is passed through.
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ExtractError>;
}

/// HTTP GraphQL client bound to one endpoint and one credential.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl GraphqlClient {
    /// Creates a client for `api_url` authenticating with `api_token`,
    /// using default HTTP settings.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::with_config(&Config::new(api_url, api_token))
    }

    /// Creates a client from a full [`Config`].
    ///
    /// The credential is sent as the raw `Authorization` header value on
    /// every request. No `Bearer ` prefix is added; the API expects the
    /// bare token.
    pub fn with_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http.timeout)
            .user_agent(&config.http.user_agent)
            .build()
            .expect("Failed to create HTTP client");

        GraphqlClient {
            client,
            api_url: config.api_url.clone(),
            api_token: config.auth.api_token.clone(),
        }
    }

    /// Returns the configured endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Validates the endpoint URL format and scheme.
    fn validate_url(&self) -> Result<Url, ExtractError> {
        let parsed = Url::parse(&self.api_url).map_err(|_| {
            error!("Invalid endpoint URL: {}", self.api_url);
            ExtractError::Validation {
                kind: ValidationErrorKind::InvalidUrl,
                context: ErrorContext::new(&self.api_url, operations::URL_VALIDATION),
            }
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => {
                error!("Unsupported endpoint URL scheme: {}", scheme);
                Err(ExtractError::Validation {
                    kind: ValidationErrorKind::InvalidUrl,
                    context: ErrorContext::new(&self.api_url, operations::URL_VALIDATION)
                        .with_info(format!("Unsupported scheme: {scheme}")),
                })
            }
        }
    }

    /// Maps a non-success HTTP status to the matching error.
    fn status_error(&self, status: reqwest::StatusCode) -> ExtractError {
        let context = ErrorContext::new(&self.api_url, operations::EXECUTE_QUERY)
            .with_info(format!("HTTP status: {status}"));

        match status.as_u16() {
            HTTP_UNAUTHORIZED => ExtractError::Auth {
                kind: AuthErrorKind::InvalidToken,
                context,
            },
            HTTP_FORBIDDEN => ExtractError::Auth {
                kind: AuthErrorKind::PermissionDenied,
                context,
            },
            HTTP_TOO_MANY_REQUESTS => ExtractError::Network {
                kind: NetworkErrorKind::RateLimited,
                context,
            },
            code => ExtractError::Network {
                kind: NetworkErrorKind::ServerError(code),
                context,
            },
        }
    }

    /// Maps reqwest transport errors to [`ExtractError`] variants.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ExtractError {
        let kind = if error.is_timeout() {
            NetworkErrorKind::Timeout
        } else {
            NetworkErrorKind::ConnectionFailed
        };
        ExtractError::Network {
            kind,
            context: ErrorContext::new(&self.api_url, operations::EXECUTE_QUERY)
                .with_info(format!("Request failed: {error}")),
        }
    }
}

#[async_trait]
impl GraphqlExecutor for GraphqlClient {
    /// Posts `{"query": ..., "variables": ...}` to the endpoint.
    ///
    /// Headers: `Content-Type: application/json` and `Authorization` carrying
    /// the raw credential.
    ///
    /// # Errors
    ///
    /// * [`ExtractError::Validation`] - malformed or non-HTTP endpoint URL
    /// * [`ExtractError::Network`] - connection failure, timeout, non-success
    ///   status, or a body that is not valid JSON
    /// * [`ExtractError::Auth`] - the endpoint answered 401 or 403
    #[instrument(skip(self, query, variables))]
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ExtractError> {
        self.validate_url()?;

        debug!("Executing GraphQL query");
        let body = json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", &self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        debug!("Received HTTP response: {}", status);
        if !status.is_success() {
            return Err(self.status_error(status));
        }

        response.json::<Value>().await.map_err(|e| {
            error!("Failed to parse response body: {}", e);
            ExtractError::Network {
                kind: NetworkErrorKind::InvalidResponseBody,
                context: ErrorContext::new(&self.api_url, operations::READ_RESPONSE_BODY)
                    .with_info(format!("Error: {e}")),
            }
        })
    }
}
