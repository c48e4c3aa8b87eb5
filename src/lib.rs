// Copyright 2025 Cowboy AI, LLC.

//! # CIM Equation
//!
//! Category equations for planning connections between components.
//!
//! Wiring is described declaratively with a small algebra and executed only
//! when asked:
//! - **Connectable**: anything with a unique string identity
//! - **Connector**: the side-effecting operation joining a source to a sink
//! - **Terms**: sources, sinks and a deduplicated set of planned links
//! - **Operations**: `+` (add), `-` (discard), `*` (connect)
//! - **Identity / Zero**: `I` passes boundaries through a composition, `O`
//!   truncates them
//! - **Evaluation**: fire the planned links, optionally in canonical order
//!
//! ## Design Principles
//!
//! 1. **Immutability**: every operation returns a new term
//! 2. **Identity**: set membership and equality use identity strings only
//! 3. **One connector per equation**: terms carry a shared connector handle
//!    and refuse to combine with terms of another connector
//! 4. **Determinism**: sorted evaluation is reproducible across construction
//!    orders

#![warn(missing_docs)]

pub mod category;
mod connectable;
mod entity_set;
mod errors;
mod link_set;

#[cfg(test)]
mod test_support;

pub use category::{
    Category, EntityOf, EquationFactory, EquationTerm, EvaluationOrder, Operation,
    ProcessedTerm, TermShape,
};
pub use connectable::{Connectable, Connector, ConnectorHandle, FnConnector};
pub use entity_set::EntitySet;
pub use errors::{ConnectorError, EquationError, EquationResult};
pub use link_set::{LinkKey, LinkSet, PlannedLink};
