// Copyright 2025 Cowboy AI, LLC.

//! Factory for the leaf terms of one equation

use std::sync::Arc;

use super::{EntityOf, EquationTerm};
use crate::connectable::{Connector, ConnectorHandle};

/// Builds the leaves `I`, `O` and `W(x)` of a category equation
///
/// Every term built by one factory shares its connector. Terms from two
/// factories with different connector ids refuse to be combined.
///
/// ```rust
/// use cim_equation::{Category, EquationFactory, FnConnector};
///
/// let g = EquationFactory::new(FnConnector::new("noop", |_: &String, _: &String| Ok(())));
/// let a = g.w("a".to_string());
///
/// let through = a.connect(&g.i())?;
/// assert_eq!(through.sources().to_string(), "a,");
///
/// let cut = a.connect(&g.o())?;
/// assert!(cut.sources().is_empty());
/// # Ok::<(), cim_equation::EquationError>(())
/// ```
pub struct EquationFactory<C: Connector> {
    connector: ConnectorHandle<C>,
}

impl<C: Connector> EquationFactory<C> {
    /// Factory for equations connected by `connector`
    pub fn new(connector: C) -> Self {
        Self::with_handle(ConnectorHandle::new(connector))
    }

    /// Factory sharing an existing connector handle
    pub fn with_handle(connector: ConnectorHandle<C>) -> Self {
        Self { connector }
    }

    /// The connector every term of this factory carries
    pub fn connector(&self) -> &ConnectorHandle<C> {
        &self.connector
    }

    /// The identity term
    pub fn identity(&self) -> EquationTerm<C> {
        EquationTerm::identity(self.connector.clone())
    }

    /// The terminator term
    pub fn zero(&self) -> EquationTerm<C> {
        EquationTerm::zero(self.connector.clone())
    }

    /// Wrap a connectable into a term
    pub fn wrap(&self, entity: impl Into<Arc<EntityOf<C>>>) -> EquationTerm<C> {
        EquationTerm::wrapper(self.connector.clone(), entity.into())
    }

    /// Short for [`identity`](Self::identity)
    pub fn i(&self) -> EquationTerm<C> {
        self.identity()
    }

    /// Short for [`zero`](Self::zero)
    pub fn o(&self) -> EquationTerm<C> {
        self.zero()
    }

    /// Short for [`wrap`](Self::wrap)
    pub fn w(&self, entity: impl Into<Arc<EntityOf<C>>>) -> EquationTerm<C> {
        self.wrap(entity)
    }
}

impl<C: Connector> Clone for EquationFactory<C> {
    fn clone(&self) -> Self {
        Self::with_handle(self.connector.clone())
    }
}
