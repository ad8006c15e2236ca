//! # Unicall Core
//!
//! `unicall-core` is the typed unary RPC client dispatch core underneath
//! generated service clients: the machinery that turns a declarative method
//! descriptor table into strongly-typed, callable client methods layered over
//! an abstract transport and an interceptor chain.
//!
//! ## Key Components
//!
//! * **[`descriptor::ServiceIdentity`]:** the immutable method descriptor
//!   table a service client is generated against, validated at construction.
//! * **[`transport::Transport`]:** the capability the caller supplies; the
//!   core is agnostic to the wire and the concurrency substrate underneath.
//! * **[`interceptor::Interceptor`]:** middleware composed around the
//!   transport in onion order, able to transform requests, wrap results, or
//!   short-circuit a call before the transport is reached.
//! * **[`call::CallHandle`]:** the per-invocation handle with cooperative
//!   cancellation and four independently awaitable channels (request echo,
//!   leading metadata, response, trailing metadata plus status).
//! * **[`dispatch`]:** the synchronous path gluing the above together; this
//!   is what each generated client method delegates to.
//!
//! Strictly unary: one request, exactly one terminal outcome per call. There
//! is no streaming shape, no server-side dispatch, and no retry policy in the
//! core (retries belong in an interceptor).
//!
//! ## Re-exports
//!
//! This crate re-exports `bytes`, `prost` and `tonic` so that consumers use
//! compatible versions of the underlying vocabulary types.
pub mod call;
pub mod descriptor;
pub mod dispatch;
pub mod interceptor;
pub mod options;
pub mod transport;

// Re-exports
pub use bytes;
pub use prost;
pub use tonic;
