//! A module for working with edges.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// An unweighted link between two vertices. The `source`-`target` naming only reflects the order
/// the edge was written in, the link itself has no direction.
#[derive(Clone, Copy, Debug, Eq)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge between two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::edge::Edge;
    ///
    /// let edge = Edge::new(1, 4);
    /// assert_eq!(edge, Edge::new(4, 1));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the vertex the edge was written from.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the vertex the edge was written to.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns both ends as a `(source, target)` pair.
    pub fn into_pair(self) -> (T, T) {
        (self.source, self.target)
    }

    /// Returns whether both ends of the edge are the same vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::edge::Edge;
    ///
    /// assert!(Edge::new(3, 3).is_loop());
    /// assert!(!Edge::new(3, 4).is_loop());
    /// ```
    pub fn is_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }

    /// Given one end of the edge, returns the other one, or `None` if `vertex` isn't part of the
    /// edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::edge::Edge;
    ///
    /// let edge = Edge::new(5, 6);
    ///
    /// assert_eq!(edge.opposite(&5), Some(&6));
    /// assert_eq!(edge.opposite(&6), Some(&5));
    /// assert_eq!(edge.opposite(&7), None);
    /// ```
    pub fn opposite(&self, vertex: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        if &self.source == vertex {
            Some(&self.target)
        } else if &self.target == vertex {
            Some(&self.source)
        } else {
            None
        }
    }
}

//
// Trait implementations
//

impl<T> From<(T, T)> for Edge<T> {
    fn from((source, target): (T, T)) -> Self {
        Self::new(source, target)
    }
}

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == c && b == d || a == d && b == c
    }
}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (&self.source, &self.target);

        // Hash the smaller end first so (a, b) and (b, a) land in the same bucket.
        let (low, high) = match a.cmp(b) {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };

        low.hash(state);
        high.hash(state);
    }
}
