use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::RpcCallError,
    handle::{Callbacks, RpcHandle, RpcOutcome},
    model::{ResultArity, RpcRequest, RpcResponse},
    transport::{HttpPostClient, HttpPostError, HttpTextResponse},
};

/// Sends JSON-RPC 1.1 style calls to one endpoint through an [`HttpPostClient`].
///
/// Every [`dispatch`](RpcCallDispatcher::dispatch) issues exactly one POST;
/// nothing is retried or cached, and calls do not affect each other.
#[derive(Debug, Clone)]
pub struct RpcCallDispatcher<C: HttpPostClient> {
    client: C,
    endpoint: Arc<str>,
}

impl<C: HttpPostClient> RpcCallDispatcher<C> {
    pub fn new(client: C, endpoint: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Call `method` with positional `params`.
    ///
    /// `params` must serialize to a json array (a tuple, slice or `Vec`); each
    /// element becomes one positional param. The request is started before
    /// this returns, so it must be called inside a tokio runtime. Every
    /// failure, including failing to serialize `params`, is delivered through
    /// the returned handle.
    pub fn dispatch<P>(
        &self,
        method: &str,
        params: &P,
        arity: ResultArity,
        callbacks: Callbacks,
    ) -> RpcHandle
    where
        P: Serialize + ?Sized,
    {
        let body = match encode_request(method, params) {
            Ok(body) => body,
            Err(e) => {
                return RpcHandle::settled(Err(RpcCallError::local_serialization(e)))
                    .with_callbacks(callbacks);
            }
        };
        tracing::debug!(method, endpoint = %self.endpoint, "issuing rpc call");
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let method = method.to_owned();
        RpcHandle::spawn(async move {
            let response = client.post_text(endpoint.clone(), body.clone()).await;
            let outcome = settle(response, arity, endpoint, body);
            tracing::trace!(method = %method, ok = outcome.is_ok(), "rpc call settled");
            outcome
        })
        .with_callbacks(callbacks)
    }
}

/// Serialize the envelope for `method` with `params` spread positionally.
pub fn encode_request<P>(method: &str, params: &P) -> Result<String, serde_json::Error>
where
    P: Serialize + ?Sized,
{
    let params = match serde_json::to_value(params)? {
        Value::Array(params) => params,
        other => {
            return Err(serde::ser::Error::custom(format!(
                "params must serialize to a json array, got {other}"
            )));
        }
    };
    serde_json::to_string(&RpcRequest::new(method, params))
}

fn settle<E>(
    response: Result<HttpTextResponse, HttpPostError<E>>,
    arity: ResultArity,
    endpoint: Arc<str>,
    request_body: String,
) -> RpcOutcome<Value>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let response = response.map_err(RpcCallError::unknown_transport)?;
    if response.is_success() {
        let text = response.body.as_deref().unwrap_or_default();
        return RpcResponse::from_text(text)
            .and_then(RpcResponse::into_result)
            .map(|result| arity.unwrap_result(result))
            .map_err(|e| RpcCallError::response_parse(e, endpoint, request_body));
    }
    let Some(text) = response.non_empty_body() else {
        return Err(RpcCallError::UnknownTransport { source: None });
    };
    match RpcResponse::from_text(text) {
        Ok(body) => Err(RpcCallError::Remote(body.into_error())),
        Err(error) => Err(RpcCallError::MalformedErrorBody {
            status: response.status.as_u16(),
            error: Arc::new(error),
            body: text.to_owned(),
        }),
    }
}
