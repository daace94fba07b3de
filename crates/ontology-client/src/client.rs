use std::sync::Arc;

use serde::Serialize;

use crate::{
    deprecation::DeprecationNotice,
    dispatcher::RpcCallDispatcher,
    handle::{Callbacks, RpcHandle},
    model::{OntologyMethod, ResultArity},
    transport::HttpPostClient,
};

/// Identifier-like values accepted in list params: gene ids, GO ids, domains
/// and evidence codes.
pub trait Term: AsRef<str> + Serialize {}

impl<T: AsRef<str> + Serialize + ?Sized> Term for T {}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OntologyClientConfig {
    pub endpoint: Arc<str>,
}

impl OntologyClientConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:7062";

    pub fn with_endpoint(endpoint: impl Into<Arc<str>>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for OntologyClientConfig {
    fn default() -> Self {
        Self::with_endpoint(Self::DEFAULT_ENDPOINT)
    }
}

/// Client of the Ontology service.
///
/// Clones share the endpoint, the http client and the deprecation notice
/// state.
#[derive(Clone)]
pub struct OntologyClient<C: HttpPostClient> {
    dispatcher: RpcCallDispatcher<C>,
    deprecation: Arc<DeprecationNotice>,
}

impl<C: HttpPostClient> std::fmt::Debug for OntologyClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyClient")
            .field("endpoint", &self.dispatcher.endpoint())
            .field("deprecation_warned", &self.deprecation.has_warned())
            .finish()
    }
}

#[cfg(feature = "__reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
impl OntologyClient<reqwest::Client> {
    /// Client for `endpoint` using a default [`reqwest::Client`].
    pub fn new(endpoint: impl Into<Arc<str>>) -> Self {
        Self::with_client(
            reqwest::Client::default(),
            OntologyClientConfig::with_endpoint(endpoint),
        )
    }
}

impl<C: HttpPostClient> OntologyClient<C> {
    pub fn with_client(client: C, config: OntologyClientConfig) -> Self {
        Self {
            dispatcher: RpcCallDispatcher::new(client, config.endpoint),
            deprecation: Arc::new(DeprecationNotice::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.dispatcher.endpoint()
    }

    pub fn dispatcher(&self) -> &RpcCallDispatcher<C> {
        &self.dispatcher
    }

    pub fn deprecation_notice(&self) -> &DeprecationNotice {
        &self.deprecation
    }

    /// Call any remote method of the service, e.g. one without a dedicated
    /// wrapper or one returning several values.
    pub fn call<P>(
        &self,
        method: &str,
        params: &P,
        arity: ResultArity,
        callbacks: Callbacks,
    ) -> RpcHandle
    where
        P: Serialize + ?Sized,
    {
        self.dispatcher.dispatch(method, params, arity, callbacks)
    }

    fn call_method<P>(&self, method: OntologyMethod, params: &P, callbacks: Callbacks) -> RpcHandle
    where
        P: Serialize + ?Sized,
    {
        self.dispatcher
            .dispatch(method.remote_name(), params, method.arity(), callbacks)
    }
}

/// Emits each operation of the table together with its deprecated `_async`
/// twin, which logs the deprecation advisory once per client and then
/// behaves exactly like the operation. Every operation takes a trailing
/// [`Callbacks`]; pass `Callbacks::default()` to only use the handle.
macro_rules! ontology_operations {
    (
        $(
            $(#[$meta:meta])*
            $method:ident => fn $name:ident, $deprecated:ident ($($param:ident: $param_ty:ty),* $(,)?);
        )*
    ) => {
        impl<C: HttpPostClient> OntologyClient<C> {
            $(
                $(#[$meta])*
                pub fn $name(&self, $($param: $param_ty,)* callbacks: Callbacks) -> RpcHandle {
                    self.call_method(OntologyMethod::$method, &($($param,)*), callbacks)
                }

                #[doc = concat!("Deprecated alias of [`", stringify!($name), "`](Self::", stringify!($name), ").")]
                #[deprecated(note = "the `_async` suffixed methods are deprecated, use the methods without the suffix")]
                pub fn $deprecated(&self, $($param: $param_ty,)* callbacks: Callbacks) -> RpcHandle {
                    self.deprecation.warn_once();
                    self.$name($($param,)* callbacks)
                }
            )*
        }

        $(
            const _: () = assert!(
                OntologyMethod::$method.param_count() == [$(stringify!($param)),*].len()
            );
        )*
    };
}

ontology_operations! {
    /// GO terms annotated to `gene_ids` in genome `service_name`, restricted
    /// to the given GO `domains` and `evidence_codes`.
    GetGoidlist => fn get_goidlist, get_goidlist_async(
        service_name: &str,
        gene_ids: &[impl Term],
        domains: &[impl Term],
        evidence_codes: &[impl Term],
    );
    /// Descriptions of the GO terms `go_ids`.
    GetGoDescription => fn get_go_description, get_go_description_async(
        go_ids: &[impl Term],
    );
    /// GO enrichment of `gene_ids`; `enrichment_type` selects the statistic
    /// computed by the service.
    GetGoEnrichment => fn get_go_enrichment, get_go_enrichment_async(
        service_name: &str,
        gene_ids: &[impl Term],
        domains: &[impl Term],
        evidence_codes: &[impl Term],
        enrichment_type: &str,
    );
}
