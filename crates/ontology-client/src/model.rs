//! Wire types of the JSON-RPC 1.1 style protocol spoken by the service.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value of the `version` field of every request envelope.
pub const PROTOCOL_VERSION: &str = "1.1";

/// Request envelope, serialized once per call.
///
/// ```json
/// { "method": "Ontology.get_go_description", "params": [["GO:0008150"]], "version": "1.1" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RpcRequest<'a> {
    pub method: Cow<'a, str>,
    pub params: Vec<Value>,
    pub version: Cow<'a, str>,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: impl Into<Cow<'a, str>>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            version: Cow::Borrowed(PROTOCOL_VERSION),
        }
    }
}

/// Response envelope: `{ "result": [..] }` on success, `{ "error": .. }` on failure.
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<Value>,
}

impl RpcResponse {
    /// Parse a response body. Any json text is accepted; a body that is not
    /// an object simply carries neither field.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(mut fields) => Ok(Self {
                result: fields.remove("result"),
                error: fields.remove("error"),
            }),
            _ => Ok(Self::default()),
        }
    }

    /// The `result` sequence; missing or non-array results are an error.
    pub fn into_result(self) -> Result<Vec<Value>, serde_json::Error> {
        serde_json::from_value(self.result.unwrap_or_default())
    }

    /// The `error` payload, `null` when absent.
    pub fn into_error(self) -> Value {
        self.error.unwrap_or_default()
    }
}

/// How the `result` sequence of a response is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ResultArity {
    /// Deliver `result[0]` on its own, `null` if the sequence is empty.
    #[default]
    Single,
    /// Deliver the whole `result` sequence as a json array.
    Many,
}

impl ResultArity {
    pub(crate) fn unwrap_result(self, result: Vec<Value>) -> Value {
        match self {
            ResultArity::Single => result.into_iter().next().unwrap_or(Value::Null),
            ResultArity::Many => Value::Array(result),
        }
    }
}

/// Remote procedures exposed by the Ontology service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OntologyMethod {
    GetGoidlist,
    GetGoDescription,
    GetGoEnrichment,
}

impl OntologyMethod {
    pub const SERVICE_NAME: &'static str = "Ontology";
    pub const ALL: [OntologyMethod; 3] = [
        OntologyMethod::GetGoidlist,
        OntologyMethod::GetGoDescription,
        OntologyMethod::GetGoEnrichment,
    ];

    /// Fully qualified name used in the `method` field of the envelope.
    pub const fn remote_name(self) -> &'static str {
        match self {
            OntologyMethod::GetGoidlist => "Ontology.get_goidlist",
            OntologyMethod::GetGoDescription => "Ontology.get_go_description",
            OntologyMethod::GetGoEnrichment => "Ontology.get_go_enrichment",
        }
    }

    /// All Ontology methods return a single logical value.
    pub const fn arity(self) -> ResultArity {
        ResultArity::Single
    }

    /// Number of positional params the remote method expects. The client
    /// operations are checked against it at compile time.
    pub const fn param_count(self) -> usize {
        match self {
            OntologyMethod::GetGoidlist => 4,
            OntologyMethod::GetGoDescription => 1,
            OntologyMethod::GetGoEnrichment => 5,
        }
    }
}

impl std::fmt::Display for OntologyMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.remote_name())
    }
}
