#![allow(dead_code)]
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Canned reply for one remote method.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn result(value: Value) -> Self {
        Self::raw(StatusCode::OK, json!({ "result": [value] }).to_string())
    }

    pub fn error(status: StatusCode, error: Value) -> Self {
        Self::raw(status, json!({ "error": error }).to_string())
    }

    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// An Ontology service stand-in answering by method name.
#[derive(Clone, Default)]
pub struct MockOntologyService {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockOntologyService {
    pub fn reply(self, method: &str, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(method.to_string(), reply);
        self
    }

    /// Raw bodies of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_values(&self) -> Vec<Value> {
        self.requests()
            .iter()
            .map(|body| serde_json::from_str(body).expect("request body should be json"))
            .collect()
    }

    /// Serve on a random local port, returning the endpoint url.
    pub async fn serve(self) -> anyhow::Result<(String, JoinHandle<std::io::Result<()>>)> {
        let app = Router::new()
            .route("/ontology", post(handle))
            .with_state(self);
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let port = listener.local_addr()?.port();
        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });
        Ok((format!("http://127.0.0.1:{port}/ontology"), server_handle))
    }
}

async fn handle(State(service): State<MockOntologyService>, body: String) -> (StatusCode, String) {
    service.requests.lock().unwrap().push(body.clone());
    let method = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|request| request.get("method")?.as_str().map(str::to_owned))
        .unwrap_or_default();
    let reply = service.replies.lock().unwrap().get(&method).cloned();
    let Some(reply) = reply else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": { "name": "JSONRPCError", "code": -32601, "message": "no such method" } })
                .to_string(),
        );
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (reply.status, reply.body)
}

/// An endpoint on which nothing listens.
pub async fn closed_endpoint() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{port}/ontology"))
}
