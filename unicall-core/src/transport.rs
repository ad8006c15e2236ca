//! # Transport Abstraction
//!
//! The capability the caller supplies underneath the dispatch core. A
//! transport owns everything this crate is agnostic to: the wire encoding,
//! connection management, and the concrete channel (an HTTP/2 connection, an
//! in-process pipe, or a test double).
use crate::{call::RawCall, descriptor::MethodDescriptor, options::CallOptions};
use bytes::Bytes;

/// A unary call transport.
///
/// `invoke` must be non-blocking: create a completer/handle pair with
/// [`crate::call::channel`], kick off the work, and return the handle
/// immediately. The transport must eventually settle all four channels of
/// every call it accepts, success or failure, and must observe
/// [`crate::call::CallCompleter::cancelled`] so caller-side cancellation and
/// cutoff expiry reach it.
///
/// Whether one transport instance may serve concurrent calls is the
/// transport's own contract; the core adds no constraint beyond `Send + Sync`.
pub trait Transport: Send + Sync {
    /// Service-level default options, applied underneath every call's own
    /// options.
    fn default_options(&self) -> CallOptions {
        CallOptions::new()
    }

    /// Merges caller-supplied options over this transport's defaults.
    fn merge_options(&self, caller: CallOptions) -> CallOptions {
        self.default_options().merge(caller)
    }

    /// Starts a unary exchange and returns its handle.
    fn invoke(&self, method: MethodDescriptor, options: CallOptions, input: Bytes) -> RawCall;
}
