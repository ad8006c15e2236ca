//! # Call Options
//!
//! Per-call configuration: cutoff (timeout or absolute deadline), outgoing
//! metadata, and extra interceptors.
//!
//! Options are built up with the `with_*` methods, merged with the
//! transport's service-level defaults via [`CallOptions::merge`], and treated
//! as immutable from that point on. Merge policy:
//!
//! * scalar fields (`timeout`, `deadline`): the per-call value wins when
//!   set, otherwise the default applies;
//! * `metadata`: merged key-wise, a per-call entry replaces the default
//!   entry under the same key;
//! * `interceptors`: concatenated, defaults first (so default interceptors
//!   sit on the outside of the onion).
use crate::interceptor::Interceptor;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tonic::metadata::{KeyAndValueRef, MetadataKey, MetadataMap, MetadataValue};

#[derive(Debug, thiserror::Error)]
pub enum InvalidMetadataError {
    #[error("Invalid metadata (header) key '{key}': '{source}'")]
    Key {
        key: String,
        source: tonic::metadata::errors::InvalidMetadataKey,
    },
    #[error("Invalid metadata (header) value for key '{key}': '{source}'")]
    Value {
        key: String,
        source: tonic::metadata::errors::InvalidMetadataValue,
    },
}

/// Configuration for a single call.
#[derive(Default, Clone)]
pub struct CallOptions {
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    metadata: MetadataMap,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the call if the transport has not produced a response within
    /// `timeout` of dispatch. Takes precedence over [`Self::with_deadline`]
    /// when both are set.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The same cutoff expressed as an absolute point in time.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attaches a metadata (header) entry to the outgoing request.
    pub fn with_metadata(mut self, key: &str, value: &str) -> Result<Self, InvalidMetadataError> {
        let k = MetadataKey::from_str(key).map_err(|source| InvalidMetadataError::Key {
            key: key.to_string(),
            source,
        })?;
        let v = MetadataValue::from_str(value).map_err(|source| InvalidMetadataError::Value {
            key: key.to_string(),
            source,
        })?;
        self.metadata.insert(k, v);
        Ok(self)
    }

    /// Adds an interceptor for this call only. Interceptors added later end
    /// up further inside the chain, closer to the transport.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    /// The absolute cutoff for this call, if any. `timeout` wins over
    /// `deadline` when both are set.
    pub fn effective_deadline(&self, now: Instant) -> Option<Instant> {
        match (self.timeout, self.deadline) {
            (Some(timeout), _) => Some(now + timeout),
            (None, deadline) => deadline,
        }
    }

    /// Merges per-call options over these defaults.
    pub fn merge(&self, overrides: CallOptions) -> CallOptions {
        let mut metadata = self.metadata.clone();
        for entry in overrides.metadata.iter() {
            match entry {
                KeyAndValueRef::Ascii(k, v) => {
                    metadata.insert(k.clone(), v.clone());
                }
                KeyAndValueRef::Binary(k, v) => {
                    metadata.insert_bin(k.clone(), v.clone());
                }
            }
        }

        let mut interceptors = self.interceptors.clone();
        interceptors.extend(overrides.interceptors);

        CallOptions {
            timeout: overrides.timeout.or(self.timeout),
            deadline: overrides.deadline.or(self.deadline),
            metadata,
            interceptors,
        }
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("timeout", &self.timeout)
            .field("deadline", &self.deadline)
            .field("metadata", &self.metadata)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
