use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RpcCallError;

pub type RpcOutcome<T> = Result<T, RpcCallError>;

type SuccessCallback<T> = Box<dyn FnOnce(T) + Send + 'static>;
type ErrorCallback = Box<dyn FnOnce(RpcCallError) + Send + 'static>;

/// An optional success / error callback pair for a single call.
///
/// At most one of the two is ever invoked, exactly once.
pub struct Callbacks<T = Value> {
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> std::fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl<T> Callbacks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl FnOnce(T) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(RpcCallError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_success.is_none() && self.on_error.is_none()
    }
}

/// Handle to the eventual outcome of one rpc call.
///
/// The call runs on the tokio runtime whether or not the handle is polled.
/// The outcome is computed once and cached: every clone of the handle, every
/// `.await` and every callback registered with [`RpcHandle::on_success`] or
/// [`RpcHandle::on_error`] observes the same settlement, including callbacks
/// registered after the call has already settled.
///
/// Registering callbacks spawns onto the current tokio runtime, so it must
/// happen inside one.
pub struct RpcHandle<T = Value> {
    outcome: Shared<BoxFuture<'static, RpcOutcome<T>>>,
}

impl<T: Clone> Clone for RpcHandle<T> {
    fn clone(&self) -> Self {
        Self {
            outcome: self.outcome.clone(),
        }
    }
}

impl<T: Clone> std::fmt::Debug for RpcHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcHandle")
            .field("settled", &self.outcome.peek().is_some())
            .finish()
    }
}

impl<T> RpcHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start `call` as a task on the current runtime.
    pub(crate) fn spawn<F>(call: F) -> Self
    where
        F: Future<Output = RpcOutcome<T>> + Send + 'static,
    {
        let task = tokio::spawn(call);
        Self::from_future(async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::trace!("rpc call task failed to join: {e}");
                    Err(RpcCallError::TaskAborted)
                }
            }
        })
    }

    /// Wrap a future; it only makes progress while the handle is awaited.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = RpcOutcome<T>> + Send + 'static,
    {
        Self {
            outcome: future.boxed().shared(),
        }
    }

    /// A handle that has already settled with `outcome`.
    pub fn settled(outcome: RpcOutcome<T>) -> Self {
        Self::from_future(futures::future::ready(outcome))
    }

    /// The outcome, once any clone of this handle has observed it.
    pub fn peek(&self) -> Option<&RpcOutcome<T>> {
        self.outcome.peek()
    }

    pub fn on_success(&self, callback: impl FnOnce(T) + Send + 'static) -> &Self {
        let outcome = self.outcome.clone();
        tokio::spawn(async move {
            if let Ok(value) = outcome.await {
                callback(value);
            }
        });
        self
    }

    pub fn on_error(&self, callback: impl FnOnce(RpcCallError) + Send + 'static) -> &Self {
        let outcome = self.outcome.clone();
        tokio::spawn(async move {
            if let Err(error) = outcome.await {
                callback(error);
            }
        });
        self
    }

    /// Register both halves of `callbacks`, returning the handle for chaining.
    pub fn with_callbacks(self, callbacks: Callbacks<T>) -> Self {
        if callbacks.is_empty() {
            return self;
        }
        let Callbacks {
            on_success,
            on_error,
        } = callbacks;
        if let Some(callback) = on_success {
            self.on_success(callback);
        }
        if let Some(callback) = on_error {
            self.on_error(callback);
        }
        self
    }

    pub fn map<U, F>(self, f: F) -> RpcHandle<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        RpcHandle::from_future(self.outcome.map(|outcome| outcome.map(f)))
    }

    pub fn and_then<U, F>(self, f: F) -> RpcHandle<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> RpcOutcome<U> + Send + 'static,
    {
        RpcHandle::from_future(self.outcome.map(|outcome| outcome.and_then(f)))
    }
}

impl RpcHandle<Value> {
    /// Deserialize the delivered value into `R`.
    pub fn decode<R>(self) -> RpcHandle<R>
    where
        R: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.and_then(|value| {
            R::deserialize(&value).map_err(|error| RpcCallError::Decode {
                error: Arc::new(error),
                value,
            })
        })
    }
}

impl<T: Clone> Future for RpcHandle<T> {
    type Output = RpcOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.outcome.poll_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use serde_json::json;
    use tokio::sync::{mpsc, oneshot};

    use super::*;

    #[tokio::test]
    async fn test_await_spawned_call() {
        let handle = RpcHandle::spawn(async { Ok(json!("GO:123")) });
        assert_eq!(handle.await.unwrap(), json!("GO:123"));
    }

    #[tokio::test]
    async fn test_clones_observe_same_outcome() {
        let handle = RpcHandle::spawn(async { Ok(json!(1)) });
        let other = handle.clone();
        assert_eq!(handle.await.unwrap(), json!(1));
        assert_eq!(other.clone().await.unwrap(), json!(1));
        assert!(other.peek().is_some());
    }

    #[tokio::test]
    async fn test_success_callback_only() {
        let (success_tx, success_rx) = oneshot::channel();
        let errors = Arc::new(AtomicUsize::new(0));
        let handle = RpcHandle::spawn(async { Ok(json!({ "GO:1": "biological_process" })) });
        handle
            .on_success(move |value| {
                let _ = success_tx.send(value);
            })
            .on_error({
                let errors = errors.clone();
                move |_| {
                    errors.fetch_add(1, Ordering::SeqCst);
                }
            });
        let value = tokio::time::timeout(Duration::from_secs(1), success_rx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value, json!({ "GO:1": "biological_process" }));
        assert!(handle.await.is_ok());
        tokio::task::yield_now().await;
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_callback() {
        let (error_tx, error_rx) = oneshot::channel();
        let successes = Arc::new(AtomicUsize::new(0));
        let handle: RpcHandle = RpcHandle::spawn(async {
            Err(RpcCallError::Remote(json!({ "message": "bad gene id" })))
        })
        .with_callbacks(
            Callbacks::new()
                .on_success({
                    let successes = successes.clone();
                    move |_| {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                })
                .on_error(move |error| {
                    let _ = error_tx.send(error);
                }),
        );
        let error = error_rx.await.unwrap();
        assert_eq!(error.to_value(), json!({ "message": "bad gene id" }));
        assert!(handle.await.is_err());
        tokio::task::yield_now().await;
        assert_eq!(successes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_callbacks() {
        assert!(Callbacks::<Value>::default().is_empty());
        assert!(!Callbacks::<Value>::new().on_error(|_| {}).is_empty());
        assert!(!Callbacks::<Value>::new().on_success(|_| {}).is_empty());
    }

    #[tokio::test]
    async fn test_late_registration_after_settlement() {
        let handle = RpcHandle::settled(Ok(json!("done")));
        assert_eq!(handle.clone().await.unwrap(), json!("done"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.on_success(move |value| {
            let _ = tx.send(value);
        });
        assert_eq!(rx.recv().await, Some(json!("done")));
        // the sender was moved into the callback, which ran once and was dropped
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_decode() {
        let handle = RpcHandle::settled(Ok(json!({ "GO:0008150": ["biological_process"] })));
        let decoded: HashMap<String, Vec<String>> = handle.decode().await.unwrap();
        assert_eq!(decoded["GO:0008150"], vec!["biological_process".to_string()]);

        let handle = RpcHandle::settled(Ok(json!("not a map")));
        let error = handle.decode::<HashMap<String, Vec<String>>>().await.unwrap_err();
        assert!(matches!(error, RpcCallError::Decode { ref value, .. } if value == &json!("not a map")));
    }

    #[tokio::test]
    async fn test_map_keeps_error() {
        let handle: RpcHandle = RpcHandle::settled(Err(RpcCallError::TaskAborted));
        let mapped = handle.map(|value| value.to_string());
        assert!(matches!(mapped.await, Err(RpcCallError::TaskAborted)));
    }

    async fn panicking_call() -> RpcOutcome<Value> {
        panic!("call task panicked")
    }

    #[tokio::test]
    async fn test_panicking_task_is_aborted() {
        let handle = RpcHandle::spawn(panicking_call());
        assert!(matches!(handle.await, Err(RpcCallError::TaskAborted)));
    }
}
