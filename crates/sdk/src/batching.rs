//! Transport layer that merges concurrent JSON-RPC requests into batch
//! requests, so that reads issued together (e.g. with `futures::try_join!`)
//! cost one round trip. Batching uses the node's JSON-RPC batch support and
//! works on any node, unlike Multicall3 aggregation.
//!
//! The layer does not send anything itself. Requests are queued to a
//! background task which groups them, forwards each group to the inner
//! transport and routes the responses back by request id.

use {
    alloy::{
        rpc::json_rpc::{Id, RequestPacket, Response, ResponsePacket, SerializedRequest},
        transports::{TransportError, TransportErrorKind},
    },
    futures::{
        channel::{mpsc, oneshot},
        stream::StreamExt as _,
    },
    serde::Deserialize,
    serde_with::{DurationMilliSeconds, serde_as},
    std::{
        collections::{HashMap, VecDeque},
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Duration,
    },
    tokio_stream::StreamExt as _,
    tower::{Layer, Service},
};

/// How requests are grouped into batches.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct BatchConfig {
    /// Most requests in one batch. 0 or 1 disables batching.
    pub max_batch_size: usize,
    /// Most batches in flight at once. 0 means no limit.
    pub max_concurrent_requests: usize,
    /// How long to wait for more requests before sending a partial batch.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "batch-delay-ms")]
    pub batch_delay: Duration,
}

impl BatchConfig {
    pub fn disabled() -> Self {
        Self {
            max_batch_size: 1,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_batch_size > 1
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 20,
            max_concurrent_requests: 10,
            batch_delay: Duration::from_millis(5),
        }
    }
}

type Reply = oneshot::Sender<Result<Response, TransportError>>;

/// Layer that buffers individual requests into batch requests. Building the
/// service spawns its background task, so it needs a Tokio runtime.
pub(crate) struct BatchCallLayer {
    config: BatchConfig,
}

impl BatchCallLayer {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for BatchCallLayer
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    type Service = BatchingTransport;

    fn layer(&self, inner: S) -> Self::Service {
        BatchingTransport::spawn(inner, &self.config)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BatchingTransport {
    queue: mpsc::UnboundedSender<(Reply, SerializedRequest)>,
}

/// Callers waiting for the response with one id. Ids can collide when
/// callers pick their own, in which case responses are handed out in request
/// order.
struct Waiters {
    first: Option<Reply>,
    rest: VecDeque<Reply>,
}

impl Waiters {
    fn new(reply: Reply) -> Self {
        Self {
            first: Some(reply),
            rest: VecDeque::new(),
        }
    }

    fn push(&mut self, reply: Reply) {
        self.rest.push_back(reply);
    }

    fn pop(&mut self) -> Option<Reply> {
        self.first.take().or_else(|| self.rest.pop_front())
    }

    fn into_iter(self) -> impl Iterator<Item = Reply> {
        self.first.into_iter().chain(self.rest)
    }
}

impl BatchingTransport {
    fn spawn<S>(inner: S, config: &BatchConfig) -> Self
    where
        S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let (queue, requests) = mpsc::unbounded();
        let concurrency =
            (config.max_concurrent_requests > 0).then_some(config.max_concurrent_requests);
        tokio::task::spawn(
            requests
                .chunks_timeout(config.max_batch_size.max(1), config.batch_delay)
                .for_each_concurrent(concurrency, move |batch| {
                    send_batch(inner.clone(), batch)
                }),
        );
        Self { queue }
    }
}

async fn send_batch<S>(mut inner: S, batch: Vec<(Reply, SerializedRequest)>)
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
{
    let mut waiters: HashMap<Id, Waiters> = HashMap::with_capacity(batch.len());
    let mut requests = Vec::with_capacity(batch.len());
    for (reply, request) in batch {
        if reply.is_canceled() {
            tracing::trace!(id = %request.id(), "caller stopped waiting");
            continue;
        }
        match waiters.get_mut(request.id()) {
            Some(existing) => existing.push(reply),
            None => {
                waiters.insert(request.id().clone(), Waiters::new(reply));
            }
        }
        requests.push(request);
    }
    if requests.is_empty() {
        return;
    }

    tracing::trace!(len = requests.len(), "sending batch");
    let packet = match requests.len() {
        1 => RequestPacket::Single(requests.remove(0)),
        _ => RequestPacket::Batch(requests),
    };
    let responses = match inner.call(packet).await {
        Ok(ResponsePacket::Single(response)) => vec![response],
        Ok(ResponsePacket::Batch(responses)) => responses,
        Err(err) => {
            let message = format!("batch request failed: {err}");
            for reply in waiters.into_values().flat_map(Waiters::into_iter) {
                let _ = reply.send(Err(TransportErrorKind::custom_str(&message)));
            }
            return;
        }
    };

    for response in responses {
        match waiters.get_mut(&response.id).and_then(Waiters::pop) {
            Some(reply) => {
                let _ = reply.send(Ok(response));
            }
            None => tracing::warn!(id = %response.id, "response without a waiting caller"),
        }
    }
}

impl Service<RequestPacket> for BatchingTransport {
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = ResponsePacket;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.queue.is_closed() {
            return Poll::Ready(Err(TransportErrorKind::backend_gone()));
        }
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, packet: RequestPacket) -> Self::Future {
        let RequestPacket::Single(request) = packet else {
            return Box::pin(async {
                Err(TransportErrorKind::custom_str(
                    "explicit batch requests are not supported on a batching transport",
                ))
            });
        };
        let (reply, response) = oneshot::channel();
        let queued = self.queue.unbounded_send((reply, request));
        Box::pin(async move {
            queued.map_err(|_| TransportErrorKind::backend_gone())?;
            let response = response
                .await
                .map_err(|_| TransportErrorKind::backend_gone())??;
            Ok(ResponsePacket::Single(response))
        })
    }
}
