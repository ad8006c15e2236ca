//! # Dispatch
//!
//! The synchronous dispatch path that generated client methods delegate to:
//! run the interceptor chain over the transport, convert a short-circuit into
//! an immediately-failed handle, and arm the cutoff watchdog. Nothing here
//! suspends; the caller gets its handle back before the transport has done
//! any work.
use crate::{
    call::{CallError, CallHandle, RawCall},
    descriptor::MethodDescriptor,
    interceptor::Next,
    options::CallOptions,
    transport::Transport,
};
use bytes::Bytes;
use prost::Message;
use tokio::time::Instant;

/// Dispatches a unary call with an untyped payload.
///
/// `options` must already be merged with the transport's defaults (see
/// [`Transport::merge_options`]); the interceptor chain is taken from it. If
/// the merged options carry a timeout or deadline, the watchdog is armed on
/// the returned handle, which requires a Tokio runtime.
pub fn raw(
    transport: &dyn Transport,
    method: MethodDescriptor,
    options: CallOptions,
    input: Bytes,
) -> RawCall {
    let deadline = options.effective_deadline(Instant::now());
    let chain = options.interceptors().to_vec();

    tracing::debug!(
        method = method.name(),
        interceptors = chain.len(),
        "dispatching unary call"
    );

    let call = match Next::new(transport, &chain).run(method, options, input.clone()) {
        Ok(call) => call,
        Err(status) => {
            tracing::debug!(
                method = method.name(),
                code = ?status.code(),
                "interceptor short-circuited the call"
            );
            RawCall::failed(input, CallError::Interceptor(status))
        }
    };

    if let Some(deadline) = deadline {
        call.arm_deadline(deadline);
    }
    call
}

/// Dispatches a typed unary call: encodes the input, runs [`raw`], and wraps
/// the handle so the response decodes as `O`.
pub fn unary<I, O>(
    transport: &dyn Transport,
    method: MethodDescriptor,
    options: CallOptions,
    input: I,
) -> CallHandle<I, O>
where
    I: Message,
    O: Message + Default,
{
    let payload = Bytes::from(input.encode_to_vec());
    let call = raw(transport, method, options, payload);
    CallHandle::new(input, call)
}
