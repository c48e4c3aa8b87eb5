// Copyright 2025 Cowboy AI, LLC.

//! Category equations over connectables
//!
//! A term is a container of planned connections with two boundaries: the
//! sources it can connect from and the sinks it can be connected into.
//! Terms are combined with three operations:
//! - `+` ([`EquationTerm::add`]): union of boundaries and plans
//! - `-` ([`EquationTerm::discard`]): subtraction of boundaries and plans
//! - `*` ([`EquationTerm::connect`]): plan every source of the left term into
//!   every sink of the right term
//!
//! The identity term `I` passes boundaries through a composition, the zero
//! term `O` truncates them. Nothing is connected until a term is evaluated.
//!
//! ```rust
//! use cim_equation::{Category, EquationFactory, FnConnector};
//!
//! let g = EquationFactory::new(FnConnector::new("print", |a: &String, b: &String| {
//!     println!("{a} -> {b}");
//!     Ok(())
//! }));
//! let a = g.wrap("a".to_string());
//! let b = g.wrap("b".to_string());
//! let c = g.wrap("c".to_string());
//!
//! let plan = a.add(&b)?.connect(&c)?;
//! assert_eq!(plan.links().len(), 2);
//! plan.evaluate_sorted()?;
//! # Ok::<(), cim_equation::EquationError>(())
//! ```

mod factory;
mod term;

pub use factory::EquationFactory;
pub use term::{EquationTerm, Operation, ProcessedTerm, TermShape};

use crate::connectable::{Connector, ConnectorHandle};
use crate::entity_set::EntitySet;
use crate::errors::EquationResult;
use crate::link_set::LinkSet;

/// Entity type joined by connector `C`
pub type EntityOf<C> = <C as Connector>::Entity;

/// Order in which planned links are handed to the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvaluationOrder {
    /// Order in which the links were planned
    #[default]
    Insertion,
    /// Connector id, then source id, then sink id
    Sorted,
}

/// A container of planned connection operations
pub trait Category {
    /// Connector performing the planned links
    type Connector: Connector;

    /// Entities this term can connect from
    fn sources(&self) -> &EntitySet<EntityOf<Self::Connector>>;

    /// Entities this term can be connected into
    fn sinks(&self) -> &EntitySet<EntityOf<Self::Connector>>;

    /// Connector shared by the whole equation
    fn connector(&self) -> &ConnectorHandle<Self::Connector>;

    /// Planned links
    fn links(&self) -> &LinkSet<Self::Connector>;

    /// True for the zero term `O`
    fn is_zero(&self) -> bool;

    /// True for the identity term `I` and sums containing it
    fn is_identity(&self) -> bool;

    /// Same connector, same boundaries and the same planned links
    fn is_equivalent<T>(&self, other: &T) -> bool
    where
        T: Category<Connector = Self::Connector> + ?Sized,
    {
        self.connector().same_connector(other.connector())
            && self.sources() == other.sources()
            && self.sinks() == other.sinks()
            && self.links() == other.links()
    }

    /// Connect all the planned links in insertion order
    fn evaluate(&self) -> EquationResult<()> {
        self.links().evaluate_all()
    }

    /// Connect all the planned links in canonical order
    fn evaluate_sorted(&self) -> EquationResult<()> {
        self.links().evaluate_all_sorted()
    }

    /// Connect all the planned links in the given order
    fn evaluate_with(&self, order: EvaluationOrder) -> EquationResult<()> {
        self.links().evaluate_all_with(order)
    }
}
