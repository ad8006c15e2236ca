use super::{CallError, RawCall, raw::Trailers};
use prost::Message;
use std::marker::PhantomData;

/// The typed view of one unary call, returned by generated client methods.
///
/// `I` and `O` are the method's input and output message types. The handle
/// keeps the typed request value it was dispatched with, so the request echo
/// resolves immediately and never fails; the remaining channels delegate to
/// the underlying [`RawCall`], decoding the response payload on the way out.
pub struct CallHandle<I, O> {
    request: I,
    raw: RawCall,
    _output: PhantomData<fn() -> O>,
}

impl<I, O> CallHandle<I, O>
where
    O: Message + Default,
{
    pub(crate) fn new(request: I, raw: RawCall) -> Self {
        Self {
            request,
            raw,
            _output: PhantomData,
        }
    }

    /// Echo of the request value this call was dispatched with. Available
    /// immediately.
    pub fn request(&self) -> &I {
        &self.request
    }

    /// Leading metadata, settled no later than the response.
    pub async fn headers(&self) -> Result<tonic::metadata::MetadataMap, CallError> {
        self.raw.headers().await
    }

    /// The decoded response message.
    pub async fn response(&self) -> Result<O, CallError> {
        let payload = self.raw.response().await?;
        Ok(O::decode(payload)?)
    }

    /// Trailing metadata plus the terminal status, settled last.
    pub async fn trailers(&self) -> Result<Trailers, CallError> {
        self.raw.trailers().await
    }

    /// Cancels the call. Idempotent; see [`RawCall::cancel`].
    pub fn cancel(&self) {
        self.raw.cancel()
    }

    pub fn is_terminated(&self) -> bool {
        self.raw.is_terminated()
    }

    /// The untyped handle, for callers that want the raw payload channels.
    pub fn raw(&self) -> &RawCall {
        &self.raw
    }
}
