// Copyright 2025 Cowboy AI, LLC.

//! Planned links and deduplicated sets of them
//!
//! A [`PlannedLink`] is a deferred `source -> sink` connection under one
//! connector. A [`LinkSet`] holds planned links keyed by
//! `(connector id, source id, sink id)`; the derived ordering of [`LinkKey`]
//! is the canonical evaluation order.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::category::EvaluationOrder;
use crate::connectable::{Connectable, Connector, ConnectorHandle};
use crate::errors::{EquationError, EquationResult};

/// Identity of a planned link
///
/// Field order defines the canonical sort: connector, then source, then sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    /// Connector identity
    pub connector: String,
    /// Source entity identity
    pub source: String,
    /// Sink entity identity
    pub sink: String,
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} [{}]", self.source, self.sink, self.connector)
    }
}

/// One planned, not yet executed, connection
pub struct PlannedLink<C: Connector> {
    source: Arc<C::Entity>,
    sink: Arc<C::Entity>,
    connector: ConnectorHandle<C>,
}

impl<C: Connector> PlannedLink<C> {
    /// Plan `source -> sink` under `connector`
    pub fn new(connector: ConnectorHandle<C>, source: Arc<C::Entity>, sink: Arc<C::Entity>) -> Self {
        Self {
            source,
            sink,
            connector,
        }
    }

    /// The entity being connected from
    pub fn source(&self) -> &Arc<C::Entity> {
        &self.source
    }

    /// The entity being connected to
    pub fn sink(&self) -> &Arc<C::Entity> {
        &self.sink
    }

    /// Connector that will perform the link
    pub fn connector(&self) -> &ConnectorHandle<C> {
        &self.connector
    }

    /// Identity of this link
    pub fn key(&self) -> LinkKey {
        LinkKey {
            connector: self.connector.id().to_string(),
            source: self.source.id().to_string(),
            sink: self.sink.id().to_string(),
        }
    }

    /// Ask the connector to perform this link
    pub fn evaluate(&self) -> EquationResult<()> {
        trace!(
            connector = self.connector.id(),
            source = self.source.id(),
            sink = self.sink.id(),
            "Applying planned link"
        );
        self.connector
            .connect(&self.source, &self.sink)
            .map_err(|source| EquationError::ConnectionFailed {
                connector: self.connector.id().to_string(),
                source_id: self.source.id().to_string(),
                sink_id: self.sink.id().to_string(),
                source,
            })
    }
}

impl<C: Connector> Clone for PlannedLink<C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            sink: Arc::clone(&self.sink),
            connector: self.connector.clone(),
        }
    }
}

impl<C: Connector> PartialEq for PlannedLink<C> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<C: Connector> Eq for PlannedLink<C> {}

impl<C: Connector> fmt::Display for PlannedLink<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.id(), self.sink.id())
    }
}

impl<C: Connector> fmt::Debug for PlannedLink<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlannedLink").field(&self.key()).finish()
    }
}

/// Deduplicated set of planned links under a single connector
pub struct LinkSet<C: Connector> {
    connector: ConnectorHandle<C>,
    links: IndexMap<LinkKey, PlannedLink<C>>,
}

impl<C: Connector> LinkSet<C> {
    /// Empty set bound to `connector`
    pub fn new(connector: ConnectorHandle<C>) -> Self {
        Self {
            connector,
            links: IndexMap::new(),
        }
    }

    /// Build a set from links, checking each was planned under `connector`
    pub fn from_links(
        connector: ConnectorHandle<C>,
        links: impl IntoIterator<Item = PlannedLink<C>>,
    ) -> EquationResult<Self> {
        let mut set = Self::new(connector);
        for link in links {
            set.connector.ensure_compatible(link.connector())?;
            set.insert(link);
        }
        Ok(set)
    }

    /// Connector this set was built under
    pub fn connector(&self) -> &ConnectorHandle<C> {
        &self.connector
    }

    /// Fail unless `other` was built under the same connector
    pub fn ensure_compatible(&self, other: &Self) -> EquationResult<()> {
        self.connector.ensure_compatible(&other.connector)
    }

    /// Fail unless every link was planned under this set's connector
    pub fn ensure_compatible_links(&self, links: &[PlannedLink<C>]) -> EquationResult<()> {
        links
            .iter()
            .try_for_each(|link| self.connector.ensure_compatible(link.connector()))
    }

    /// Links of both sets
    pub fn union(&self, other: &Self) -> EquationResult<Self> {
        self.ensure_compatible(other)?;
        let mut merged = self.clone();
        for link in other.links.values() {
            merged.insert(link.clone());
        }
        Ok(merged)
    }

    /// Links of `self` that are not in `other`
    pub fn difference(&self, other: &Self) -> EquationResult<Self> {
        self.ensure_compatible(other)?;
        let mut remaining = self.clone();
        for key in other.links.keys() {
            remaining.remove(key);
        }
        Ok(remaining)
    }

    /// In-place insert; a link with the same key is replaced
    pub(crate) fn insert(&mut self, link: PlannedLink<C>) {
        self.links.insert(link.key(), link);
    }

    /// In-place removal by key
    pub(crate) fn remove(&mut self, key: &LinkKey) -> Option<PlannedLink<C>> {
        self.links.shift_remove(key)
    }

    /// True when a link with this key is planned
    pub fn contains(&self, key: &LinkKey) -> bool {
        self.links.contains_key(key)
    }

    /// True when `source -> sink` is planned under this set's connector
    pub fn contains_pair(&self, source: &str, sink: &str) -> bool {
        self.contains(&LinkKey {
            connector: self.connector.id().to_string(),
            source: source.to_string(),
            sink: sink.to_string(),
        })
    }

    /// Number of planned links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when nothing is planned
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &LinkKey> {
        self.links.keys()
    }

    /// Links in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PlannedLink<C>> {
        self.links.values()
    }

    /// Links in insertion order
    pub fn to_vec(&self) -> Vec<PlannedLink<C>> {
        self.links.values().cloned().collect()
    }

    /// Links in canonical order: connector id, source id, sink id
    pub fn to_sorted_vec(&self) -> Vec<PlannedLink<C>> {
        self.sorted().into_iter().cloned().collect()
    }

    fn sorted(&self) -> Vec<&PlannedLink<C>> {
        let mut entries: Vec<_> = self.links.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().map(|(_, link)| link).collect()
    }

    /// Evaluate every link in insertion order, stopping at the first failure
    pub fn evaluate_all(&self) -> EquationResult<()> {
        self.evaluate_all_with(EvaluationOrder::Insertion)
    }

    /// Evaluate every link in canonical order, stopping at the first failure
    pub fn evaluate_all_sorted(&self) -> EquationResult<()> {
        self.evaluate_all_with(EvaluationOrder::Sorted)
    }

    /// Evaluate every link in the given order, stopping at the first failure
    pub fn evaluate_all_with(&self, order: EvaluationOrder) -> EquationResult<()> {
        debug!(
            "Evaluating {} planned links with connector {} in {:?} order",
            self.links.len(),
            self.connector.id(),
            order
        );
        match order {
            EvaluationOrder::Insertion => self.links.values().try_for_each(PlannedLink::evaluate),
            EvaluationOrder::Sorted => self.sorted().into_iter().try_for_each(PlannedLink::evaluate),
        }
    }
}

impl<C: Connector> Clone for LinkSet<C> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            links: self.links.clone(),
        }
    }
}

/// Same connector and the same keys, regardless of order
impl<C: Connector> PartialEq for LinkSet<C> {
    fn eq(&self, other: &Self) -> bool {
        self.connector.same_connector(&other.connector)
            && self.links.len() == other.links.len()
            && other.links.keys().all(|key| self.links.contains_key(key))
    }
}

impl<C: Connector> Eq for LinkSet<C> {}

impl<C: Connector> fmt::Display for LinkSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for link in self.sorted() {
            write!(f, "{link},")?;
        }
        Ok(())
    }
}

impl<C: Connector> fmt::Debug for LinkSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkSet")
            .field("connector", &self.connector.id())
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{node, Recorder};
    use pretty_assertions::assert_eq;

    fn link(connector: &ConnectorHandle<Recorder>, source: &str, sink: &str) -> PlannedLink<Recorder> {
        PlannedLink::new(connector.clone(), node(source), node(sink))
    }

    fn links(connector: &ConnectorHandle<Recorder>, pairs: &[(&str, &str)]) -> LinkSet<Recorder> {
        let mut set = LinkSet::new(connector.clone());
        for (source, sink) in pairs {
            set.insert(link(connector, source, sink));
        }
        set
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        let set = links(&rec, &[("a", "b"), ("a", "b"), ("a", "a")]);
        assert_eq!(set.len(), 2);
        assert!(set.contains_pair("a", "b"));
        assert!(set.contains_pair("a", "a"));
        assert!(!set.contains_pair("b", "a"));
    }

    #[test]
    fn test_remove_by_key() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        let mut set = links(&rec, &[("a", "b"), ("a", "a")]);

        let removed = set.remove(&link(&rec, "a", "a").key());
        assert!(removed.is_some());
        assert_eq!(set.to_string(), "a -> b,");
    }

    #[test]
    fn test_union_and_difference() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        let left = links(&rec, &[("a", "c"), ("a", "d")]);
        let right = links(&rec, &[("a", "d"), ("b", "c")]);

        let union = left.union(&right).unwrap();
        assert_eq!(union.len(), 3);

        let diff = union.difference(&right).unwrap();
        assert_eq!(diff, links(&rec, &[("a", "c")]));
        // subtraction is not symmetric
        let reverse = right.difference(&left).unwrap();
        assert_eq!(reverse, links(&rec, &[("b", "c")]));
    }

    #[test]
    fn test_incompatible_connectors_rejected() {
        let audio = ConnectorHandle::new(Recorder::new("audio"));
        let midi = ConnectorHandle::new(Recorder::new("midi"));
        let left = links(&audio, &[("a", "b")]);
        let right = links(&midi, &[("a", "b")]);

        assert!(left.union(&right).unwrap_err().is_connector_mismatch());
        assert!(left.difference(&right).unwrap_err().is_connector_mismatch());
        assert!(left.ensure_compatible(&right).is_err());
        assert!(left
            .ensure_compatible_links(&[link(&midi, "x", "y")])
            .is_err());
        assert!(LinkSet::from_links(audio.clone(), vec![link(&midi, "x", "y")]).is_err());
        // equality reports false instead of failing
        assert_ne!(left, right);
    }

    #[test]
    fn test_from_links_under_matching_connector() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        // another handle under the same id counts as the same connector
        let twin = ConnectorHandle::new(Recorder::new("rec"));

        let set = LinkSet::from_links(
            rec.clone(),
            vec![link(&rec, "a", "c"), link(&twin, "a", "b"), link(&rec, "a", "c")],
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains_pair("a", "b"));
        assert!(set.contains_pair("a", "c"));
        assert!(!set.contains_pair("c", "a"));
        assert_eq!(set.connector().id(), "rec");
        assert_eq!(set, links(&rec, &[("a", "b"), ("a", "c")]));
        // insertion order is kept until asked for the sorted projection
        let inserted: Vec<_> = set.iter().map(ToString::to_string).collect();
        assert_eq!(inserted, vec!["a -> c", "a -> b"]);

        assert!(set
            .ensure_compatible_links(&[link(&rec, "x", "y"), link(&twin, "y", "z")])
            .is_ok());
        assert!(set.ensure_compatible_links(&[]).is_ok());
        assert!(LinkSet::from_links(rec, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        let first = links(&rec, &[("a", "c"), ("b", "d")]);
        let second = links(&rec, &[("b", "d"), ("a", "c")]);
        assert_eq!(first, second);
        assert_ne!(first, links(&rec, &[("a", "c")]));
    }

    #[test]
    fn test_sorted_projection() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        let set = links(&rec, &[("b", "a"), ("a", "c"), ("a", "b")]);

        let insertion: Vec<_> = set.to_vec().iter().map(ToString::to_string).collect();
        assert_eq!(insertion, vec!["b -> a", "a -> c", "a -> b"]);

        let sorted: Vec<_> = set.to_sorted_vec().iter().map(ToString::to_string).collect();
        assert_eq!(sorted, vec!["a -> b", "a -> c", "b -> a"]);
    }

    #[test]
    fn test_evaluate_all_in_both_orders() {
        let rec = ConnectorHandle::new(Recorder::new("rec"));
        let set = links(&rec, &[("b", "a"), ("a", "b")]);

        set.evaluate_all().unwrap();
        set.evaluate_all_sorted().unwrap();
        assert_eq!(rec.calls(), vec!["b -> a", "a -> b", "a -> b", "b -> a"]);
    }

    #[test]
    fn test_evaluate_stops_at_first_failure() {
        let rec = ConnectorHandle::new(Recorder::failing_on("rec", "a", "c"));
        let set = links(&rec, &[("b", "c"), ("a", "d"), ("a", "c"), ("a", "b")]);

        let err = set.evaluate_all_sorted().unwrap_err();
        assert!(err.is_connection_failure());
        assert_eq!(
            err.to_string(),
            "Connection failed: rec could not connect a -> c: refused a -> c"
        );
        // a -> b ran before the failure, a -> d and b -> c never ran
        assert_eq!(rec.calls(), vec!["a -> b"]);
    }
}
