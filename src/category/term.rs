// Copyright 2025 Cowboy AI, LLC.

//! Equation terms and the composition rules between them

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{Category, EntityOf};
use crate::connectable::{Connectable, Connector, ConnectorHandle};
use crate::entity_set::EntitySet;
use crate::errors::EquationResult;
use crate::link_set::{LinkSet, PlannedLink};

/// The operations available on equation terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `+`, union
    Add,
    /// `-`, subtraction
    Discard,
    /// `*`, sequential composition
    Arrow,
}

impl Operation {
    /// Symbol used when rendering equations
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Discard => "-",
            Operation::Arrow => "*",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Record of the operation that produced a term
pub struct ProcessedTerm<C: Connector> {
    left: EquationTerm<C>,
    operation: Operation,
    right: EquationTerm<C>,
}

impl<C: Connector> ProcessedTerm<C> {
    fn new(left: EquationTerm<C>, operation: Operation, right: EquationTerm<C>) -> Self {
        Self {
            left,
            operation,
            right,
        }
    }

    /// Left-hand operand
    pub fn left(&self) -> &EquationTerm<C> {
        &self.left
    }

    /// The operation applied
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Right-hand operand
    pub fn right(&self) -> &EquationTerm<C> {
        &self.right
    }
}

impl<C: Connector> Clone for ProcessedTerm<C> {
    fn clone(&self) -> Self {
        Self::new(self.left.clone(), self.operation, self.right.clone())
    }
}

/// Same operation applied to equivalent operands
impl<C: Connector> PartialEq for ProcessedTerm<C> {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && self.left == other.left && self.right == other.right
    }
}

impl<C: Connector> fmt::Display for ProcessedTerm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = Vec::new();
        push_lineage(&mut pending, self);
        render(f, pending)
    }
}

/// What kind of node a term is in the equation
pub enum TermShape<C: Connector> {
    /// The terminator `O`
    Zero,
    /// The identity `I`
    Identity,
    /// A single wrapped connectable
    Wrapper(Arc<EntityOf<C>>),
    /// Result of an operation on two terms
    Intermediate(ProcessedTerm<C>),
}

impl<C: Connector> Clone for TermShape<C> {
    fn clone(&self) -> Self {
        match self {
            TermShape::Zero => TermShape::Zero,
            TermShape::Identity => TermShape::Identity,
            TermShape::Wrapper(entity) => TermShape::Wrapper(Arc::clone(entity)),
            TermShape::Intermediate(lineage) => TermShape::Intermediate(lineage.clone()),
        }
    }
}

struct TermInner<C: Connector> {
    sources: EntitySet<EntityOf<C>>,
    sinks: EntitySet<EntityOf<C>>,
    connector: ConnectorHandle<C>,
    links: LinkSet<C>,
    shape: TermShape<C>,
    // Identity leaf, or a sum with an identity-flavoured operand
    identity: bool,
}

/// Unwinds lineage on the heap; a term built in many steps would otherwise
/// release its history one stack frame per step.
impl<C: Connector> Drop for TermInner<C> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let TermShape::Intermediate(lineage) = std::mem::replace(&mut self.shape, TermShape::Zero) {
            pending.push(lineage.left);
            pending.push(lineage.right);
        }
        while let Some(term) = pending.pop() {
            // shared operands are still alive elsewhere
            let Some(mut inner) = Arc::into_inner(term.inner) else {
                continue;
            };
            if let TermShape::Intermediate(lineage) = std::mem::replace(&mut inner.shape, TermShape::Zero) {
                pending.push(lineage.left);
                pending.push(lineage.right);
            }
        }
    }
}

/// A term of a category equation
///
/// Terms are immutable; `add`, `discard` and `connect` always return a new
/// term. Cloning is cheap and shares the underlying sets.
pub struct EquationTerm<C: Connector> {
    inner: Arc<TermInner<C>>,
}

impl<C: Connector> EquationTerm<C> {
    /// The identity term `I`
    pub fn identity(connector: ConnectorHandle<C>) -> Self {
        Self::leaf(connector, EntitySet::new(), TermShape::Identity)
    }

    /// The terminator term `O`
    pub fn zero(connector: ConnectorHandle<C>) -> Self {
        Self::leaf(connector, EntitySet::new(), TermShape::Zero)
    }

    /// Wrap one connectable into a term whose sources and sinks are just it
    pub fn wrapper(connector: ConnectorHandle<C>, entity: Arc<EntityOf<C>>) -> Self {
        let boundary = EntitySet::singleton(Arc::clone(&entity));
        Self::leaf(connector, boundary, TermShape::Wrapper(entity))
    }

    fn leaf(connector: ConnectorHandle<C>, boundary: EntitySet<EntityOf<C>>, shape: TermShape<C>) -> Self {
        let identity = matches!(shape, TermShape::Identity);
        Self {
            inner: Arc::new(TermInner {
                sources: boundary.clone(),
                sinks: boundary,
                links: LinkSet::new(connector.clone()),
                connector,
                shape,
                identity,
            }),
        }
    }

    fn intermediate(
        connector: ConnectorHandle<C>,
        sources: EntitySet<EntityOf<C>>,
        sinks: EntitySet<EntityOf<C>>,
        links: LinkSet<C>,
        lineage: ProcessedTerm<C>,
    ) -> Self {
        let identity = lineage.operation == Operation::Add
            && (lineage.left.is_identity() || lineage.right.is_identity());
        Self {
            inner: Arc::new(TermInner {
                sources,
                sinks,
                connector,
                links,
                shape: TermShape::Intermediate(lineage),
                identity,
            }),
        }
    }

    /// Shape of this term
    pub fn shape(&self) -> &TermShape<C> {
        &self.inner.shape
    }

    /// The operation that produced this term; `None` for leaves
    pub fn lineage(&self) -> Option<&ProcessedTerm<C>> {
        match &self.inner.shape {
            TermShape::Intermediate(lineage) => Some(lineage),
            TermShape::Zero | TermShape::Identity | TermShape::Wrapper(_) => None,
        }
    }

    /// Fail unless `other` belongs to the same equation
    pub fn ensure_compatible(&self, other: &Self) -> EquationResult<()> {
        self.inner.connector.ensure_compatible(&other.inner.connector)
    }

    /// The `+` of the equations
    pub fn add(&self, other: &Self) -> EquationResult<Self> {
        self.ensure_compatible(other)?;
        Ok(Self::intermediate(
            self.inner.connector.clone(),
            self.inner.sources.union(&other.inner.sources),
            self.inner.sinks.union(&other.inner.sinks),
            self.inner.links.union(&other.inner.links)?,
            ProcessedTerm::new(self.clone(), Operation::Add, other.clone()),
        ))
    }

    /// The `-` of the equations
    pub fn discard(&self, other: &Self) -> EquationResult<Self> {
        self.ensure_compatible(other)?;
        Ok(Self::intermediate(
            self.inner.connector.clone(),
            self.inner.sources.difference(&other.inner.sources),
            self.inner.sinks.difference(&other.inner.sinks),
            self.inner.links.difference(&other.inner.links)?,
            ProcessedTerm::new(self.clone(), Operation::Discard, other.clone()),
        ))
    }

    /// The `*` of the equations: plan every source of `self` into every sink
    /// of `next`
    pub fn connect(&self, next: &Self) -> EquationResult<Self> {
        self.ensure_compatible(next)?;
        let connector = next.inner.connector.clone();
        let lineage = ProcessedTerm::new(self.clone(), Operation::Arrow, next.clone());

        let term = match (&self.inner.shape, &next.inner.shape) {
            // O * b: nothing can be connected into the result
            (TermShape::Zero, _) => Self::intermediate(
                connector,
                next.inner.sources.clone(),
                EntitySet::new(),
                next.inner.links.clone(),
                lineage,
            ),
            // a * O: nothing can be connected from the result
            (_, TermShape::Zero) => Self::intermediate(
                connector,
                EntitySet::new(),
                self.inner.sinks.clone(),
                self.inner.links.clone(),
                lineage,
            ),
            (
                TermShape::Identity | TermShape::Wrapper(_) | TermShape::Intermediate(_),
                TermShape::Identity | TermShape::Wrapper(_) | TermShape::Intermediate(_),
            ) => {
                let staged = self.stage_links(next);
                debug!("Connect staged {} new links", staged.len());

                let mut sources = next.inner.sources.clone();
                if next.is_identity() {
                    // a * (I + b)
                    sources = sources.union(&self.inner.sources);
                }
                let mut sinks = self.inner.sinks.clone();
                if self.is_identity() {
                    // (a + I) * b
                    sinks = sinks.union(&next.inner.sinks);
                }

                let links = self
                    .inner
                    .links
                    .union(&next.inner.links)?
                    .union(&staged)?;
                Self::intermediate(connector, sources, sinks, links, lineage)
            }
        };
        Ok(term)
    }

    fn stage_links(&self, next: &Self) -> LinkSet<C> {
        let connector = &self.inner.connector;
        let mut staged = LinkSet::new(connector.clone());
        for source in self.inner.sources.iter() {
            for sink in next.inner.sinks.iter() {
                staged.insert(PlannedLink::new(
                    connector.clone(),
                    Arc::clone(source),
                    Arc::clone(sink),
                ));
            }
        }
        staged
    }
}

impl<C: Connector> Category for EquationTerm<C> {
    type Connector = C;

    fn sources(&self) -> &EntitySet<EntityOf<C>> {
        &self.inner.sources
    }

    fn sinks(&self) -> &EntitySet<EntityOf<C>> {
        &self.inner.sinks
    }

    fn connector(&self) -> &ConnectorHandle<C> {
        &self.inner.connector
    }

    fn links(&self) -> &LinkSet<C> {
        &self.inner.links
    }

    fn is_zero(&self) -> bool {
        matches!(self.inner.shape, TermShape::Zero)
    }

    fn is_identity(&self) -> bool {
        self.inner.identity
    }
}

impl<C: Connector> Clone for EquationTerm<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Structural equality; see [`Category::is_equivalent`]
impl<C: Connector> PartialEq for EquationTerm<C> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl<C: Connector> fmt::Display for EquationTerm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, vec![Piece::Term(self)])
    }
}

enum Piece<'a, C: Connector> {
    Term(&'a EquationTerm<C>),
    Text(&'static str),
}

/// Queue `(left) op (right)` so that popping yields it left to right
fn push_lineage<'a, C: Connector>(pending: &mut Vec<Piece<'a, C>>, lineage: &'a ProcessedTerm<C>) {
    pending.extend([
        Piece::Text(")"),
        Piece::Term(&lineage.right),
        Piece::Text(" ("),
        Piece::Text(lineage.operation.symbol()),
        Piece::Text(") "),
        Piece::Term(&lineage.left),
        Piece::Text("("),
    ]);
}

// Explicit stack: lineage depth is bounded by memory, not by the thread stack
fn render<C: Connector>(f: &mut fmt::Formatter<'_>, mut pending: Vec<Piece<'_, C>>) -> fmt::Result {
    while let Some(piece) = pending.pop() {
        match piece {
            Piece::Text(text) => f.write_str(text)?,
            Piece::Term(term) => match &term.inner.shape {
                TermShape::Zero => f.write_str("O")?,
                TermShape::Identity => f.write_str("I")?,
                TermShape::Wrapper(entity) => f.write_str(entity.id())?,
                TermShape::Intermediate(lineage) => push_lineage(&mut pending, lineage),
            },
        }
    }
    Ok(())
}

impl<C: Connector> fmt::Debug for EquationTerm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquationTerm")
            .field("expression", &self.to_string())
            .field("sources", &self.inner.sources)
            .field("sinks", &self.inner.sinks)
            .field("links", &self.inner.links)
            .finish()
    }
}
