//! # Interceptors
//!
//! Middleware wrapped around the transport, in standard onion order: the
//! first-declared interceptor sees the outgoing request first and the
//! returned call handle last; the last-declared interceptor sits innermost,
//! closest to the transport.
//!
//! An interceptor may rewrite the method, options or payload before calling
//! [`Next::run`], may observe or wrap the returned [`RawCall`], or may
//! short-circuit by returning an error status without calling `next` at all,
//! in which case the transport is never invoked. Cross-cutting concerns such
//! as auth stamping, tracing or retry belong here, not in the core.
use crate::{
    call::RawCall, descriptor::MethodDescriptor, options::CallOptions, transport::Transport,
};
use bytes::Bytes;
use std::sync::Arc;
use tonic::Status;

/// Middleware around a unary call.
pub trait Interceptor: Send + Sync {
    fn call(
        &self,
        method: MethodDescriptor,
        options: CallOptions,
        input: Bytes,
        next: Next<'_>,
    ) -> Result<RawCall, Status>;
}

/// The remainder of the chain below the current interceptor, ending at the
/// transport.
///
/// Running the head of the chain with the rest as `next`, recursively, is the
/// right-to-left composition of the declared interceptor list over the
/// transport: invocation order is declaration order on the way in and the
/// reverse on the way out.
pub struct Next<'a> {
    transport: &'a dyn Transport,
    chain: &'a [Arc<dyn Interceptor>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, chain: &'a [Arc<dyn Interceptor>]) -> Self {
        Self { transport, chain }
    }

    /// Invokes the rest of the chain, bottoming out at the transport.
    pub fn run(
        self,
        method: MethodDescriptor,
        options: CallOptions,
        input: Bytes,
    ) -> Result<RawCall, Status> {
        match self.chain.split_first() {
            Some((head, rest)) => head.call(
                method,
                options,
                input,
                Next {
                    transport: self.transport,
                    chain: rest,
                },
            ),
            None => Ok(self.transport.invoke(method, options, input)),
        }
    }
}
