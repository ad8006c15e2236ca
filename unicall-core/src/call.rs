//! # Call Handles
//!
//! Per-invocation result plumbing. Every dispatched call hands the caller a
//! handle with four independently awaitable channels:
//!
//! 1. the request echo (settled immediately at creation),
//! 2. leading metadata (headers),
//! 3. the response payload,
//! 4. trailing metadata plus the terminal [`tonic::Status`].
//!
//! Each channel settles exactly once, with either a value or a [`CallError`].
//! Awaiting one channel never forces or blocks on another, but once the
//! underlying transport operation completes (or the call is cancelled or its
//! cutoff expires) every channel reaches a terminal state.
//!
//! Two views exist over the same channels:
//!
//! * [`RawCall`] / [`CallCompleter`]: the untyped pair created by
//!   [`channel`]. The transport keeps the completer and settles channels as
//!   the call progresses; interceptors and the dispatch layer see the
//!   `RawCall`.
//! * [`CallHandle`]: the typed wrapper returned to the end caller, which
//!   decodes the response payload into the method's output message type.
//!
//! Ordering is guaranteed per call: leading metadata never settles after the
//! response, and trailing metadata always settles last.
mod error;
mod handle;
mod raw;

pub use error::CallError;
pub use handle::CallHandle;
pub use raw::{CallCompleter, RawCall, Trailers, channel};
