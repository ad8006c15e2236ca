//! Untyped call plumbing shared by transports, interceptors and the typed
//! handle.
//!
//! [`channel`] creates the settle-once slots for the four channels plus the
//! cancellation signal. The transport keeps the [`CallCompleter`]; everything
//! upstream sees the [`RawCall`].
use super::CallError;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;
use tonic::{Code, Status, metadata::MetadataMap};

type Slot<T> = watch::Sender<Option<Result<T, CallError>>>;

/// Trailing metadata plus the terminal status of the call.
pub type Trailers = (MetadataMap, Status);

struct Slots {
    request: Slot<Bytes>,
    headers: Slot<MetadataMap>,
    response: Slot<Bytes>,
    trailers: Slot<Trailers>,
    cancel: watch::Sender<bool>,
}

/// Settles a slot exactly once. Returns whether this write won.
fn settle<T>(slot: &Slot<T>, value: Result<T, CallError>) -> bool {
    let mut value = Some(value);
    slot.send_if_modified(|current| match current {
        None => {
            *current = value.take();
            true
        }
        Some(_) => false,
    })
}

async fn wait<T: Clone>(slot: &Slot<T>) -> Result<T, CallError> {
    let mut rx = slot.subscribe();
    loop {
        if let Some(value) = rx.borrow_and_update().clone() {
            return value;
        }
        // The sender lives inside the `Slots` we hold, so `changed` only
        // errors if that invariant is ever broken.
        if rx.changed().await.is_err() {
            return Err(CallError::Cancelled);
        }
    }
}

impl Slots {
    fn new(request: Bytes) -> Self {
        let slots = Self {
            request: watch::Sender::new(None),
            headers: watch::Sender::new(None),
            response: watch::Sender::new(None),
            trailers: watch::Sender::new(None),
            cancel: watch::Sender::new(false),
        };
        // The request echo settles at creation, before the call is even
        // handed to the transport.
        settle(&slots.request, Ok(request));
        slots
    }

    /// Settles every unresolved channel with `err`, in the contractual order
    /// (headers, then response, then trailers). Already-settled channels keep
    /// their values. Returns whether any channel was newly settled.
    fn fail_unresolved(&self, err: CallError) -> bool {
        let mut any = false;
        any |= settle(&self.headers, Err(err.clone()));
        any |= settle(&self.response, Err(err.clone()));
        any |= settle(&self.trailers, Err(err));
        any
    }

    fn is_terminated(&self) -> bool {
        self.trailers.borrow().is_some()
    }
}

/// Creates the completer/handle pair for one call.
///
/// The transport settles channels through the [`CallCompleter`] as the call
/// progresses and watches [`CallCompleter::cancelled`] for caller-side
/// cancellation. The [`RawCall`] goes back up the interceptor chain to the
/// caller.
pub fn channel(request: Bytes) -> (CallCompleter, RawCall) {
    let slots = Arc::new(Slots::new(request));
    (
        CallCompleter {
            slots: Arc::clone(&slots),
            finished: false,
        },
        RawCall { slots },
    )
}

/// The transport-side writer for a call's channels.
///
/// Every channel settles at most once; later writes are no-ops and report
/// `false`. Dropping the completer before the call terminated settles the
/// remaining channels with a transport failure, so a buggy transport can
/// never leave the caller hanging.
pub struct CallCompleter {
    slots: Arc<Slots>,
    finished: bool,
}

impl CallCompleter {
    /// Settles the leading metadata channel.
    pub fn send_headers(&self, headers: MetadataMap) -> bool {
        settle(&self.slots.headers, Ok(headers))
    }

    /// Settles the response channel.
    ///
    /// If the transport never produced headers, the leading metadata channel
    /// settles with an empty map first: leading metadata never resolves after
    /// the response.
    pub fn send_response(&self, payload: Bytes) -> bool {
        settle(&self.slots.headers, Ok(MetadataMap::new()));
        settle(&self.slots.response, Ok(payload))
    }

    /// Completes the call successfully, settling the trailing metadata
    /// channel with `Code::Ok`.
    ///
    /// A unary call that finishes without a response is a transport contract
    /// violation; the response channel settles with an internal transport
    /// error in that case.
    pub fn finish(&mut self, trailers: MetadataMap) -> bool {
        settle(&self.slots.headers, Ok(MetadataMap::new()));
        settle(
            &self.slots.response,
            Err(CallError::Transport(Status::internal(
                "transport finished the call without a response",
            ))),
        );
        self.finished = true;
        settle(
            &self.slots.trailers,
            Ok((trailers, Status::new(Code::Ok, ""))),
        )
    }

    /// Fails the call: every unresolved channel settles with a transport
    /// error carrying `status`. Channels that already settled keep their
    /// values.
    pub fn fail(&mut self, status: Status) -> bool {
        self.finished = true;
        self.slots.fail_unresolved(CallError::Transport(status))
    }

    /// Resolves once the caller cancels the call (or its cutoff expires).
    /// Pending forever if neither happens; transports select over this and
    /// their own work.
    pub async fn cancelled(&self) {
        let mut rx = self.slots.cancel.subscribe();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    pub fn is_cancelled(&self) -> bool {
        *self.slots.cancel.borrow()
    }
}

impl Drop for CallCompleter {
    fn drop(&mut self) {
        if !self.finished && !self.slots.is_terminated() {
            tracing::warn!("transport dropped an unfinished call");
            self.slots.fail_unresolved(CallError::Transport(Status::unavailable(
                "transport dropped the call before it terminated",
            )));
        }
    }
}

/// The caller-side view of one in-flight call, with its four independently
/// awaitable channels.
///
/// Cloning is cheap and shares the underlying channels, which lets an
/// interceptor hold on to the handle it returns.
#[derive(Clone)]
pub struct RawCall {
    slots: Arc<Slots>,
}

impl RawCall {
    /// A call that failed before reaching the transport. The request echo
    /// still settles with what would have been sent; the remaining channels
    /// settle with `err`.
    pub(crate) fn failed(request: Bytes, err: CallError) -> Self {
        let slots = Slots::new(request);
        slots.fail_unresolved(err);
        Self {
            slots: Arc::new(slots),
        }
    }

    /// Echo of the request payload. Settled at creation, so this never
    /// suspends.
    pub async fn request(&self) -> Result<Bytes, CallError> {
        wait(&self.slots.request).await
    }

    /// Leading metadata. Settles when the transport has headers, which is
    /// never after the response settles.
    pub async fn headers(&self) -> Result<MetadataMap, CallError> {
        wait(&self.slots.headers).await
    }

    /// The response payload.
    pub async fn response(&self) -> Result<Bytes, CallError> {
        wait(&self.slots.response).await
    }

    /// Trailing metadata and terminal status. Always the last channel to
    /// settle.
    pub async fn trailers(&self) -> Result<Trailers, CallError> {
        wait(&self.slots.trailers).await
    }

    /// Cancels the call: signals the transport and settles every unresolved
    /// channel with [`CallError::Cancelled`]. Idempotent; cancelling a call
    /// that already terminated is a no-op and the transport never sees the
    /// signal.
    pub fn cancel(&self) {
        if self.slots.is_terminated() || self.slots.cancel.send_replace(true) {
            return;
        }
        if self.slots.fail_unresolved(CallError::Cancelled) {
            tracing::debug!("call cancelled by caller");
        }
    }

    /// Whether the call reached a terminal state (completed, failed,
    /// cancelled or timed out).
    pub fn is_terminated(&self) -> bool {
        self.slots.is_terminated()
    }

    /// Arms the timeout/deadline watchdog. At `deadline`, any still
    /// unresolved channel settles with [`CallError::Timeout`] and the
    /// transport sees the cancellation signal. The task exits as soon as the
    /// call terminates, whichever comes first.
    ///
    /// Requires a Tokio runtime; the dispatch layer arms this when the merged
    /// options carry a cutoff.
    pub(crate) fn arm_deadline(&self, deadline: Instant) {
        let slots = Arc::clone(&self.slots);
        tokio::spawn(async move {
            let mut trailers = slots.trailers.subscribe();
            let expired = tokio::select! {
                _ = tokio::time::sleep_until(deadline) => true,
                _ = trailers.wait_for(|slot| slot.is_some()) => false,
            };
            if expired && slots.fail_unresolved(CallError::Timeout) {
                tracing::debug!("call cutoff exceeded, cancelling transport");
                slots.cancel.send_replace(true);
            }
        });
    }
}
