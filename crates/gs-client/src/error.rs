//! Client construction and transport errors

/// Errors from building or using a guest client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Endpoint is not a valid URL
    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Header value contains characters not allowed in HTTP headers
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("graphql endpoint returned status {status}")]
    Status { status: u16 },

    /// GraphQL response carried errors
    #[error("graphql errors: {}", .0.join("; "))]
    Graphql(Vec<String>),

    /// GraphQL response had neither data nor errors
    #[error("graphql response contained no data")]
    MissingData,
}

/// Result alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
