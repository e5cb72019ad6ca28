//! Construction of the JSON-RPC provider the SDK reads chain state with.
//!
//! Requests pass through three transport layers: the [`LabelingLayer`] tags
//! every request with the component that issued it, the
//! [`InstrumentationLayer`] logs each request with that label and its
//! outcome, and the batching layer merges concurrent requests into JSON-RPC
//! batches.
//!
//! Providers with batching spawn a background task and must be created
//! inside a Tokio runtime.

pub use crate::batching::BatchConfig;
use {
    crate::batching::BatchCallLayer,
    alloy::{
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::{
            client::ClientBuilder,
            json_rpc::{RequestPacket, ResponsePacket, SerializedRequest},
        },
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
    url::Url,
};

/// Creates a provider talking to the node at `url`.
pub fn provider(url: &Url) -> DynProvider {
    labeled_provider(url, "marketplace")
}

/// Like [`provider`] but requests are logged with the given component label.
pub fn labeled_provider(url: &Url, label: &str) -> DynProvider {
    configured_provider(url, label, &BatchConfig::default())
}

/// Like [`labeled_provider`] with explicit request batching.
pub fn configured_provider(url: &Url, label: &str, batching: &BatchConfig) -> DynProvider {
    let client = ClientBuilder::default()
        .layer(LabelingLayer {
            label: label.into(),
        })
        .layer(InstrumentationLayer);
    let rpc = if batching.is_enabled() {
        client
            .layer(BatchCallLayer::new(batching.clone()))
            .http(url.clone())
    } else {
        client.http(url.clone())
    };
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Creates a provider for a network from its static chain information.
pub fn network_provider(network: network::Network) -> Option<DynProvider> {
    let url = network.info().rpc_url?.parse().ok()?;
    Some(provider(&url))
}

/// Layer that attaches a label to each request that passes through.
pub(crate) struct LabelingLayer {
    pub label: String,
}

impl<S> Layer<S> for LabelingLayer {
    type Service = LabeledTransport<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LabeledTransport {
            inner,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LabeledTransport<S> {
    inner: S,
    label: String,
}

impl<S> LabeledTransport<S> {
    fn attach_label(&self, req: &mut SerializedRequest) {
        req.meta_mut()
            .extensions_mut()
            .insert(RequestLabel(self.label.clone()));
    }
}

impl<S> Service<RequestPacket> for LabeledTransport<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        req.requests_mut()
            .iter_mut()
            .for_each(|r| self.attach_label(r));
        Box::pin(self.inner.call(req))
    }
}

/// Layer that logs every request together with the [`RequestLabel`] attached
/// to it.
pub(crate) struct InstrumentationLayer;

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedTransport<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedTransport { inner }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InstrumentedTransport<S> {
    inner: S,
}

impl<S> Service<RequestPacket> for InstrumentedTransport<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let methods: Vec<String> = req
            .requests_mut()
            .iter_mut()
            .map(|r| {
                let component = r
                    .meta_mut()
                    .extensions_mut()
                    .remove::<RequestLabel>()
                    .map(|label| label.0)
                    .unwrap_or_default();
                tracing::trace!(component, method = r.method(), id = %r.id(), "executing request");
                r.method().to_string()
            })
            .collect();

        if methods.len() > 1 {
            tracing::trace!(len = methods.len(), "executing batch request");
        }

        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            match &res {
                Ok(_) => tracing::trace!(?methods, elapsed = ?start.elapsed(), "request completed"),
                Err(err) => tracing::debug!(?methods, ?err, "request failed"),
            }
            res
        })
    }
}

/// Identifies which component emitted a request.
#[derive(Debug, Clone)]
struct RequestLabel(String);

/// Read-only provider answering from a queue of mocked responses.
#[cfg(test)]
pub(crate) fn mocked(asserter: alloy::providers::mock::Asserter) -> DynProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}
