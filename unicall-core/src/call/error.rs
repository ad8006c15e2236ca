use tonic::{Code, Status};

/// Terminal failure of a call, surfaced on the handle's channels.
///
/// The core never retries; an interceptor layered over the transport owns
/// retry policy if one is wanted.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CallError {
    /// An interceptor rejected the call before reaching the transport.
    #[error("Interceptor rejected the call: '{0}'")]
    Interceptor(Status),
    /// The underlying channel failed, or the remote returned an error status.
    #[error("Transport failure: '{0}'")]
    Transport(Status),
    /// The call's timeout/deadline cutoff expired before the transport
    /// produced a response.
    #[error("Call cutoff exceeded before the transport responded")]
    Timeout,
    /// The caller cancelled the call before it reached a terminal state.
    #[error("Call cancelled")]
    Cancelled,
    /// The response payload did not decode as the method's output type.
    #[error("Failed to decode response payload: '{0}'")]
    Decode(#[from] prost::DecodeError),
}

impl CallError {
    /// The status code this failure surfaces on the completion channel.
    /// Transport-defined codes pass through unchanged.
    pub fn code(&self) -> Code {
        match self {
            CallError::Interceptor(status) | CallError::Transport(status) => status.code(),
            CallError::Timeout => Code::DeadlineExceeded,
            CallError::Cancelled => Code::Cancelled,
            CallError::Decode(_) => Code::Internal,
        }
    }

    /// This failure expressed as a [`Status`].
    pub fn status(&self) -> Status {
        match self {
            CallError::Interceptor(status) | CallError::Transport(status) => status.clone(),
            CallError::Timeout => Status::deadline_exceeded(self.to_string()),
            CallError::Cancelled => Status::cancelled(self.to_string()),
            CallError::Decode(_) => Status::internal(self.to_string()),
        }
    }
}
