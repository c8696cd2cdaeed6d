//! Client factory and GraphQL content client
//!
//! Building a client only assembles the endpoint and headers; network I/O
//! happens in [`GraphqlClient::query`].

use crate::error::{ClientError, Result};
use crate::gate::ConstructorArgs;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Builds an authenticated client handle from gate output
pub trait ClientFactory {
    /// Client handle type
    type Client;

    /// Construct a client
    ///
    /// # Errors
    /// Construction failures such as an unusable endpoint or header value.
    fn create(&self, args: &ConstructorArgs) -> Result<Self::Client>;
}

/// Factory producing [`GraphqlClient`]s
#[derive(Debug, Clone)]
pub struct GraphqlClientFactory {
    http: Client,
}

impl GraphqlClientFactory {
    /// Create factory with a shared default HTTP client
    #[must_use]
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    /// Create factory sharing an existing HTTP client
    #[must_use]
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    /// Create factory whose clients time out after `timeout`
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
        })
    }
}

impl Default for GraphqlClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for GraphqlClientFactory {
    type Client = GraphqlClient;

    fn create(&self, args: &ConstructorArgs) -> Result<GraphqlClient> {
        let endpoint = Url::parse(&args.endpoint).map_err(|source| ClientError::InvalidEndpoint {
            endpoint: args.endpoint.clone(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        if let Some(auth) = args.authorization() {
            let mut value =
                HeaderValue::from_str(&auth).map_err(|_| ClientError::InvalidHeader("Authorization"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(endpoint = %endpoint, "guest client created");
        Ok(GraphqlClient {
            endpoint,
            headers,
            http: self.http.clone(),
        })
    }
}

/// Authenticated GraphQL content client
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: Url,
    headers: HeaderMap,
    http: Client,
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    variables: serde_json::Value,
}

/// Raw GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    /// Result data
    pub data: Option<T>,
    /// Field or request errors
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// Single GraphQL error entry
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    /// Human-readable message
    pub message: String,
}

impl<T> GraphqlResponse<T> {
    /// Data, or the response errors
    ///
    /// # Errors
    /// [`ClientError::Graphql`] if errors are present,
    /// [`ClientError::MissingData`] if there is no data.
    pub fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            return Err(ClientError::Graphql(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data.ok_or(ClientError::MissingData)
    }
}

impl GraphqlClient {
    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Headers sent with every request
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Check if requests carry a credential
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Execute a query and deserialize its `data`
    ///
    /// # Errors
    /// Transport failures, non-success status, or GraphQL errors.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "graphql request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<GraphqlResponse<T>>().await?.into_data()
    }
}
