//! The HTTP POST capability the dispatcher sends requests through.
//!
//! | client | feature |
//! |--------|---------|
//! | [`reqwest::Client`](https://docs.rs/reqwest) | `reqwest` (default) |
//!
//! Any other client can be used by implementing [`HttpPostClient`].
use std::{future::Future, sync::Arc};

use http::StatusCode;
use thiserror::Error;

#[cfg(feature = "__reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
mod reqwest;

/// A POST that produced no response, wrapping the client's own error.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpPostError<E: std::error::Error + Send + Sync + 'static> {
    #[error("Client error: {0}")]
    Client(E),
}

/// A response as read by the transport: the status and the raw body text.
///
/// `body` is `None` when the transport could not read a body at all.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HttpTextResponse {
    pub status: StatusCode,
    pub body: Option<String>,
}

impl HttpTextResponse {
    pub fn new(status: StatusCode, body: Option<String>) -> Self {
        Self { status, body }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, Some(body.into()))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body, if one was read and it is not empty.
    pub fn non_empty_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}

/// Issues one HTTP POST and hands back the response as text.
///
/// Implementations send `body` verbatim, without setting a content type, and
/// must not retry. Non-2xx statuses are returned as `Ok` responses so the
/// dispatcher can read their body; `Err` is reserved for exchanges that
/// produced no response.
pub trait HttpPostClient: Clone + Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;
    fn post_text(
        &self,
        uri: Arc<str>,
        body: String,
    ) -> impl Future<Output = Result<HttpTextResponse, HttpPostError<Self::Error>>> + Send + '_;
}
