use std::sync::Arc;

use serde_json::{Value, json};

/// Transport failure kept as the source of [`RpcCallError::UnknownTransport`].
pub type DynTransportError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Status reported when a successful response carries an unparsable body.
pub const RESPONSE_PARSE_STATUS: u16 = 503;

/// Message of the error object delivered when a failed exchange has no body.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown Error";

/// Every way an rpc call can fail, as delivered through an [`RpcHandle`](crate::RpcHandle).
///
/// The error is `Clone` so that every callback and every awaiting clone of a
/// handle observes the same outcome.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum RpcCallError {
    #[error("failed to serialize request params: {0}")]
    LocalSerialization(#[source] Arc<serde_json::Error>),
    #[error("failed to parse response from {url} (status {status}): {error}")]
    ResponseParse {
        status: u16,
        #[source]
        error: Arc<serde_json::Error>,
        url: Arc<str>,
        /// The outgoing request body, kept for diagnosis.
        body: String,
    },
    /// The server answered with an error payload, forwarded verbatim.
    #[error("remote error: {0}")]
    Remote(Value),
    #[error("error response with status {status} is not valid json: {error}")]
    MalformedErrorBody {
        status: u16,
        #[source]
        error: Arc<serde_json::Error>,
        body: String,
    },
    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    UnknownTransport {
        #[source]
        source: Option<DynTransportError>,
    },
    #[error("failed to decode result: {error}")]
    Decode {
        #[source]
        error: Arc<serde_json::Error>,
        value: Value,
    },
    #[error("rpc call task was aborted before settling")]
    TaskAborted,
}

impl RpcCallError {
    pub(crate) fn local_serialization(error: serde_json::Error) -> Self {
        RpcCallError::LocalSerialization(Arc::new(error))
    }

    pub(crate) fn response_parse(error: serde_json::Error, url: Arc<str>, body: String) -> Self {
        RpcCallError::ResponseParse {
            status: RESPONSE_PARSE_STATUS,
            error: Arc::new(error),
            url,
            body,
        }
    }

    pub(crate) fn unknown_transport(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcCallError::UnknownTransport {
            source: Some(Arc::new(source)),
        }
    }

    /// The server's error payload, if this is a [`RpcCallError::Remote`] error.
    pub fn remote_payload(&self) -> Option<&Value> {
        match self {
            RpcCallError::Remote(payload) => Some(payload),
            _ => None,
        }
    }

    /// Render the error as the json object a caller would show to a user.
    ///
    /// Remote errors are returned verbatim, transport failures without a body
    /// become `{"message": "Unknown Error"}`.
    pub fn to_value(&self) -> Value {
        match self {
            RpcCallError::LocalSerialization(error) => json!({
                "message": error.to_string(),
            }),
            RpcCallError::ResponseParse {
                status,
                error,
                url,
                body,
            } => json!({
                "status": status,
                "error": error.to_string(),
                "url": url.as_ref(),
                "body": body,
            }),
            RpcCallError::Remote(payload) => payload.clone(),
            RpcCallError::MalformedErrorBody {
                status,
                error,
                body,
            } => json!({
                "status": status,
                "error": error.to_string(),
                "body": body,
            }),
            RpcCallError::UnknownTransport { .. } => json!({
                "message": UNKNOWN_ERROR_MESSAGE,
            }),
            RpcCallError::Decode { error, value } => json!({
                "message": error.to_string(),
                "value": value,
            }),
            RpcCallError::TaskAborted => json!({
                "message": self.to_string(),
            }),
        }
    }
}
