#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![doc = include_str!("../README.md")]

mod error;
pub use error::{DynTransportError, RESPONSE_PARSE_STATUS, RpcCallError, UNKNOWN_ERROR_MESSAGE};

/// Wire types of the service protocol
pub mod model;
pub use model::{OntologyMethod, ResultArity};

pub mod handle;
pub use handle::{Callbacks, RpcHandle, RpcOutcome};

pub mod dispatcher;
pub use dispatcher::RpcCallDispatcher;

mod deprecation;
pub use deprecation::{DEPRECATION_ADVISORY, DeprecationNotice};

mod client;
pub use client::{OntologyClient, OntologyClientConfig, Term};

pub mod transport;
pub use transport::{HttpPostClient, HttpPostError, HttpTextResponse};

// re-export
pub use serde_json;
