//! # Service & Method Descriptors
//!
//! Static metadata describing the operations of an RPC service.
//!
//! A [`ServiceIdentity`] is built once at load time (typically behind a
//! `LazyLock` in the crate that defines the service) and shared read-only by
//! every client instance and every in-flight call. Each [`MethodDescriptor`]
//! carries the method name, its positional index within the service, and type
//! tags for the input and output message types so that a generated client can
//! verify its dispatch table at construction time instead of failing at call
//! time.
use std::any::{self, TypeId};

/// Errors raised while building a [`ServiceIdentity`] or resolving a
/// descriptor from it.
///
/// All of these indicate a mismatch between a client and its service
/// definition. They are programming errors: fatal, surfaced at construction
/// and never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    #[error("Method '{name}' declared with index {declared} but sits at position {position}")]
    IndexOutOfOrder {
        name: &'static str,
        declared: usize,
        position: usize,
    },
    #[error("Duplicate method name '{0}' in service definition")]
    DuplicateMethodName(&'static str),
    #[error("No method at index {0}")]
    NoSuchMethod(usize),
    #[error("Method at index {index} is named '{found}', expected '{expected}'")]
    MethodNameMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Method '{method}' input type is '{found}', expected '{expected}'")]
    InputTypeMismatch {
        method: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Method '{method}' output type is '{found}', expected '{expected}'")]
    OutputTypeMismatch {
        method: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// A tag identifying a Rust message type, with its name kept around for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Static metadata for one unary RPC operation.
///
/// Descriptors are plain `Copy` values; calls reference them by value and the
/// owning [`ServiceIdentity`] keeps the canonical ordered list.
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    name: &'static str,
    index: usize,
    input: TypeTag,
    output: TypeTag,
}

impl MethodDescriptor {
    /// Describes a unary method with input `I` and output `O`.
    pub fn unary<I: 'static, O: 'static>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            index,
            input: TypeTag::of::<I>(),
            output: TypeTag::of::<O>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The positional index of this method within its service. Stable for the
    /// lifetime of the owning [`ServiceIdentity`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn input_type(&self) -> TypeTag {
        self.input
    }

    pub fn output_type(&self) -> TypeTag {
        self.output
    }
}

/// The immutable identity of a service: its full name plus the ordered list
/// of its method descriptors.
///
/// There is no mutation API. Adding or removing methods after the identity is
/// published is not a runtime-recoverable condition, so it is simply not
/// expressible.
#[derive(Debug)]
pub struct ServiceIdentity {
    name: &'static str,
    methods: Vec<MethodDescriptor>,
}

impl ServiceIdentity {
    /// Builds a service identity, validating the descriptor table.
    ///
    /// Each descriptor's declared index must equal its position in `methods`
    /// and method names must be unique.
    pub fn new(
        name: &'static str,
        methods: Vec<MethodDescriptor>,
    ) -> Result<Self, ConstructionError> {
        for (position, method) in methods.iter().enumerate() {
            if method.index != position {
                return Err(ConstructionError::IndexOutOfOrder {
                    name: method.name,
                    declared: method.index,
                    position,
                });
            }
            if methods[..position].iter().any(|m| m.name == method.name) {
                return Err(ConstructionError::DuplicateMethodName(method.name));
            }
        }
        Ok(Self { name, methods })
    }

    /// The fully qualified service name (e.g. `appevents.v1.AppEventsService`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The ordered method descriptor table.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> Option<MethodDescriptor> {
        self.methods.get(index).copied()
    }

    /// Resolves the descriptor at `index` and verifies that its name and type
    /// tags match what the caller was generated against.
    ///
    /// Generated clients call this once at construction for every method they
    /// expose, so a drifted descriptor table is rejected before the first
    /// call is ever dispatched.
    pub fn expect_method<I: 'static, O: 'static>(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<MethodDescriptor, ConstructionError> {
        let method = self
            .method(index)
            .ok_or(ConstructionError::NoSuchMethod(index))?;
        if method.name != name {
            return Err(ConstructionError::MethodNameMismatch {
                index,
                expected: name,
                found: method.name,
            });
        }
        if method.input != TypeTag::of::<I>() {
            return Err(ConstructionError::InputTypeMismatch {
                method: method.name,
                expected: TypeTag::of::<I>().name(),
                found: method.input.name(),
            });
        }
        if method.output != TypeTag::of::<O>() {
            return Err(ConstructionError::OutputTypeMismatch {
                method: method.name,
                expected: TypeTag::of::<O>().name(),
                found: method.output.name(),
            });
        }
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    struct Pong;

    #[test]
    fn indices_are_stable_and_unique() {
        let service = ServiceIdentity::new(
            "test.v1.TestService",
            vec![
                MethodDescriptor::unary::<Ping, Pong>("First", 0),
                MethodDescriptor::unary::<Ping, Pong>("Second", 1),
            ],
        )
        .unwrap();

        for _ in 0..3 {
            assert_eq!(service.method(0).unwrap().name(), "First");
            assert_eq!(service.method(1).unwrap().name(), "Second");
        }
        assert_eq!(service.methods().len(), 2);
    }

    #[test]
    fn rejects_out_of_order_index() {
        let err = ServiceIdentity::new(
            "test.v1.TestService",
            vec![MethodDescriptor::unary::<Ping, Pong>("First", 1)],
        )
        .unwrap_err();
        assert!(matches!(err, ConstructionError::IndexOutOfOrder { .. }));
    }

    #[test]
    fn rejects_duplicate_name() {
        let err = ServiceIdentity::new(
            "test.v1.TestService",
            vec![
                MethodDescriptor::unary::<Ping, Pong>("First", 0),
                MethodDescriptor::unary::<Ping, Pong>("First", 1),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ConstructionError::DuplicateMethodName("First")));
    }

    #[test]
    fn expect_method_checks_name_and_types() {
        let service = ServiceIdentity::new(
            "test.v1.TestService",
            vec![MethodDescriptor::unary::<Ping, Pong>("First", 0)],
        )
        .unwrap();

        assert!(service.expect_method::<Ping, Pong>(0, "First").is_ok());
        assert!(matches!(
            service.expect_method::<Ping, Pong>(0, "Wrong"),
            Err(ConstructionError::MethodNameMismatch { .. })
        ));
        assert!(matches!(
            service.expect_method::<Pong, Pong>(0, "First"),
            Err(ConstructionError::InputTypeMismatch { .. })
        ));
        assert!(matches!(
            service.expect_method::<Ping, Ping>(0, "First"),
            Err(ConstructionError::OutputTypeMismatch { .. })
        ));
        assert!(matches!(
            service.expect_method::<Ping, Pong>(7, "First"),
            Err(ConstructionError::NoSuchMethod(7))
        ));
    }
}
