//! A module for working with the vertices of a [`Graph`].

use std::{
    fmt::{self, Debug, Display},
    hash::Hash,
};

use itertools::Itertools;

use crate::graph::Graph;

/// A vertex as stored in the graph's node table.
///
/// Neighbours are kept as indices into the same table, in the order the links were made.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) siblings: Vec<usize>,
}

impl<T> Node<T> {
    pub(crate) fn new(key: T) -> Self {
        Self {
            key,
            siblings: Vec::new(),
        }
    }
}

/// A borrowed view of a vertex, resolving its neighbours through the owning graph.
pub struct NodeRef<'a, T> {
    graph: &'a Graph<T>,
    index: usize,
}

impl<'a, T> NodeRef<'a, T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    pub(crate) fn new(graph: &'a Graph<T>, index: usize) -> Self {
        Self { graph, index }
    }

    fn node(&self) -> &'a Node<T> {
        &self.graph.node_table()[self.index]
    }

    /// Returns the vertex key.
    pub fn key(&self) -> T {
        self.node().key
    }

    /// Returns the number of neighbours.
    pub fn degree(&self) -> usize {
        self.node().siblings.len()
    }

    /// Returns whether the vertex has exactly one neighbour.
    pub fn is_leaf(&self) -> bool {
        self.degree() == 1
    }

    /// Iterates over the neighbours in the order they were linked.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let graph = Graph::from_edges([(1, 4), (2, 4), (3, 4)]).unwrap();
    /// let hub = graph.node(4).unwrap();
    ///
    /// let keys: Vec<i32> = hub.siblings().map(|sibling| sibling.key()).collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn siblings(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a {
        let graph = self.graph;
        self.node()
            .siblings
            .iter()
            .map(move |&index| NodeRef::new(graph, index))
    }

    /// Returns the neighbour keys in the order they were linked.
    pub fn sibling_keys(&self) -> Vec<T> {
        self.siblings().map(|sibling| sibling.key()).collect()
    }
}

//
// Trait implementations
//

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.index == other.index
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T> Debug for NodeRef<'_, T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key())
            .field("siblings", &self.sibling_keys())
            .finish()
    }
}

/// Renders the vertex as `key: neighbour,neighbour,...`.
impl<T> Display for NodeRef<'_, T>
where
    T: Copy + Eq + Hash + Ord + Debug + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.key(),
            self.siblings().map(|sibling| sibling.key()).join(",")
        )
    }
}
