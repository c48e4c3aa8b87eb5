// Copyright 2025 Cowboy AI, LLC.

//! Capability contracts consumed by the equation algebra
//!
//! The algebra never owns the things it wires together, nor does it know how
//! to wire them. Callers provide both through two traits:
//! - [`Connectable`]: anything with a unique string identity
//! - [`Connector`]: the side-effecting operation joining a source to a sink
//!
//! A connector is shared by every term of one equation through a
//! [`ConnectorHandle`].

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use crate::errors::{ConnectorError, EquationError, EquationResult};

/// Implement this trait to make a value connectable by an equation
pub trait Connectable {
    /// Unique identifier of this instance within one equation
    fn id(&self) -> &str;
}

impl Connectable for String {
    fn id(&self) -> &str {
        self
    }
}

/// The operation that actually connects two connectables: `source -> sink`
pub trait Connector {
    /// The kind of value this connector joins
    type Entity: Connectable;

    /// Unique identifier of this connection type
    fn id(&self) -> &str;

    /// Connect `source` to `sink`
    fn connect(&self, source: &Self::Entity, sink: &Self::Entity) -> Result<(), ConnectorError>;
}

/// Shared handle to the single connector of an equation
///
/// Cloning the handle is cheap; every term, link set and planned link built
/// from one factory carries a clone of the same handle.
pub struct ConnectorHandle<C> {
    inner: Arc<C>,
}

impl<C> ConnectorHandle<C> {
    /// Wrap a connector into a shareable handle
    pub fn new(connector: C) -> Self {
        Self {
            inner: Arc::new(connector),
        }
    }

    /// Build a handle around an already shared connector
    pub fn from_arc(connector: Arc<C>) -> Self {
        Self { inner: connector }
    }

    /// Access the shared connector
    pub fn as_arc(&self) -> &Arc<C> {
        &self.inner
    }
}

impl<C: Connector> ConnectorHandle<C> {
    /// Connector identity, as reported by the connector
    pub fn id(&self) -> &str {
        self.inner.id()
    }

    /// True when both handles report the same connector identity
    pub fn same_connector(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Fail with [`EquationError::ConnectorMismatch`] unless both handles agree
    pub fn ensure_compatible(&self, other: &Self) -> EquationResult<()> {
        if self.same_connector(other) {
            Ok(())
        } else {
            Err(EquationError::connector_mismatch(self.id(), other.id()))
        }
    }
}

impl<C> Clone for ConnectorHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for ConnectorHandle<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C> From<C> for ConnectorHandle<C> {
    fn from(connector: C) -> Self {
        Self::new(connector)
    }
}

impl<C: fmt::Debug> fmt::Debug for ConnectorHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectorHandle").field(&self.inner).finish()
    }
}

/// Connector built from a closure and an identity
///
/// ```rust
/// use cim_equation::{Connector, FnConnector};
///
/// let printer = FnConnector::new("print", |a: &String, b: &String| {
///     println!("{a} -> {b}");
///     Ok(())
/// });
/// assert_eq!(printer.id(), "print");
/// ```
pub struct FnConnector<E, F> {
    id: String,
    connect: F,
    _entity: PhantomData<fn(&E)>,
}

impl<E, F> FnConnector<E, F>
where
    E: Connectable,
    F: Fn(&E, &E) -> Result<(), ConnectorError>,
{
    /// Create a connector named `id` that delegates to `connect`
    pub fn new(id: impl Into<String>, connect: F) -> Self {
        Self {
            id: id.into(),
            connect,
            _entity: PhantomData,
        }
    }
}

impl<E, F> Connector for FnConnector<E, F>
where
    E: Connectable,
    F: Fn(&E, &E) -> Result<(), ConnectorError>,
{
    type Entity = E;

    fn id(&self) -> &str {
        &self.id
    }

    fn connect(&self, source: &E, sink: &E) -> Result<(), ConnectorError> {
        (self.connect)(source, sink)
    }
}

impl<E, F> fmt::Debug for FnConnector<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConnector").field("id", &self.id).finish()
    }
}
