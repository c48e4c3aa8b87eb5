// Copyright 2025 Cowboy AI, LLC.

//! Identity-keyed sets of connectables
//!
//! Membership is decided by [`Connectable::id`] alone, so two distinct
//! instances reporting the same id are the same member. Iteration follows
//! insertion order; [`EntitySet::to_sorted_vec`] gives the canonical order.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::connectable::Connectable;

/// A set of connectables keyed by their identity
pub struct EntitySet<E> {
    entities: IndexMap<String, Arc<E>>,
}

impl<E: Connectable> EntitySet<E> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            entities: IndexMap::new(),
        }
    }

    /// Set with a single member
    pub fn singleton(entity: Arc<E>) -> Self {
        let mut set = Self::new();
        set.insert(entity);
        set
    }

    /// Members of both sets; on a shared identity the member of `other` wins
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for entity in other.entities.values() {
            merged.insert(Arc::clone(entity));
        }
        merged
    }

    /// Members of `self` whose identity is not in `other`
    pub fn difference(&self, other: &Self) -> Self {
        let mut remaining = self.clone();
        for id in other.entities.keys() {
            remaining.remove(id);
        }
        remaining
    }

    /// In-place insert; replaces any member with the same identity
    pub(crate) fn insert(&mut self, entity: Arc<E>) {
        self.entities.insert(entity.id().to_string(), entity);
    }

    /// In-place removal by identity
    pub(crate) fn remove(&mut self, id: &str) -> Option<Arc<E>> {
        self.entities.shift_remove(id)
    }

    /// True when a member with this identity exists
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Member with this identity
    pub fn get(&self, id: &str) -> Option<&Arc<E>> {
        self.entities.get(id)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the set has no members
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Member identities in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<E>> {
        self.entities.values()
    }

    /// Members in insertion order
    pub fn to_vec(&self) -> Vec<Arc<E>> {
        self.entities.values().cloned().collect()
    }

    /// Members ordered by identity, ascending
    pub fn to_sorted_vec(&self) -> Vec<Arc<E>> {
        let mut sorted: Vec<_> = self.entities.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        sorted.into_iter().map(|(_, e)| Arc::clone(e)).collect()
    }
}

impl<E: Connectable> Default for EntitySet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EntitySet<E> {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities.clone(),
        }
    }
}

impl<E: Connectable> FromIterator<Arc<E>> for EntitySet<E> {
    fn from_iter<I: IntoIterator<Item = Arc<E>>>(iter: I) -> Self {
        let mut set = Self::new();
        for entity in iter {
            set.insert(entity);
        }
        set
    }
}

impl<E> PartialEq for EntitySet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.entities.len() == other.entities.len()
            && other.entities.keys().all(|id| self.entities.contains_key(id))
    }
}

impl<E> Eq for EntitySet<E> {}

/// Sorted identities, each followed by a comma (`a,b,`)
impl<E: Connectable> fmt::Display for EntitySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entity in self.to_sorted_vec() {
            write!(f, "{},", entity.id())?;
        }
        Ok(())
    }
}

impl<E> fmt::Debug for EntitySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entities.keys()).finish()
    }
}
