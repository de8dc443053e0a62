//! A module for finding the centre of a tree by peeling its leaves.
//!
//! Leaves are stripped one layer at a time: every vertex with a single remaining neighbour is
//! removed and the remaining degree of that neighbour drops by one, which may turn it into a leaf
//! of the next layer. Once two or fewer vertices are left, those are the centre. The degree
//! bookkeeping lives in a table next to the graph, the adjacency lists are never touched.

use std::{
    collections::VecDeque,
    fmt::{self, Debug, Display},
    hash::Hash,
};

use tracing::debug;

use crate::{
    error::{GraphError, Result},
    graph::Graph,
    node::Node,
};

/// Decides how a two-vertex centre gets reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CenterPolicy {
    /// Report both vertices when the centre is an edge.
    #[default]
    Pair,
    /// Always report a single vertex. Of a two-vertex centre, the one that became a leaf last is
    /// kept.
    Collapse,
}

/// The centre of a tree: the vertex, or pair of adjacent vertices, with the smallest
/// eccentricity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Center<T> {
    /// A single centre vertex.
    Single(T),
    /// Both vertices, in the order peeling reached them.
    Pair(T, T),
}

impl<T: Copy + PartialEq> Center<T> {
    /// Returns the keys of the centre vertices.
    pub fn keys(&self) -> Vec<T> {
        match *self {
            Center::Single(a) => vec![a],
            Center::Pair(a, b) => vec![a, b],
        }
    }

    /// Returns whether `key` is part of the centre.
    pub fn contains(&self, key: &T) -> bool {
        match self {
            Center::Single(a) => a == key,
            Center::Pair(a, b) => a == key || b == key,
        }
    }

    /// Returns whether the centre is made of two vertices.
    pub fn is_pair(&self) -> bool {
        matches!(self, Center::Pair(..))
    }
}

impl<T: Display> Display for Center<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Center::Single(a) => write!(f, "{a}"),
            Center::Pair(a, b) => write!(f, "{a}, {b}"),
        }
    }
}

/// Finds the centre of a tree.
///
/// Fails on an empty graph, and on graphs that aren't a single tree (disconnected or cyclic).
///
/// # Examples
///
/// ```
/// use arbor::center::{find_center, Center, CenterPolicy};
/// use arbor::graph::Graph;
///
/// let graph = Graph::from_edges([(1, 2), (2, 3), (3, 4)]).unwrap();
///
/// assert_eq!(find_center(&graph, CenterPolicy::Pair).unwrap(), Center::Pair(2, 3));
/// assert_eq!(find_center(&graph, CenterPolicy::Collapse).unwrap(), Center::Single(3));
/// ```
pub fn find_center<T>(graph: &Graph<T>, policy: CenterPolicy) -> Result<Center<T>>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    let nodes = graph.node_table();
    if nodes.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    let components = count_components(nodes);
    if components > 1 {
        return Err(GraphError::Disconnected { components });
    }

    let survivors = Peeler::new(nodes).run()?;

    let center = match (survivors.as_slice(), policy) {
        ([a], _) => Center::Single(nodes[*a].key),
        ([a, b], CenterPolicy::Pair) => Center::Pair(nodes[*a].key, nodes[*b].key),
        ([_, b], CenterPolicy::Collapse) => Center::Single(nodes[*b].key),
        // A connected graph either peels down to one or two vertices or stalls on a cycle.
        _ => unreachable!("peeling left {} vertices", survivors.len()),
    };

    debug!(?center, ?policy, "found centre");

    Ok(center)
}

/// The leaf-peeling state for one centre search.
struct Peeler<'a, T> {
    nodes: &'a [Node<T>],
    /// Remaining degree of each vertex, indexed like `nodes`.
    degrees: Vec<usize>,
    removed: Vec<bool>,
    /// Only ever holds current leaves, each exactly once.
    leaves: VecDeque<usize>,
    remaining: usize,
}

impl<'a, T> Peeler<'a, T> {
    fn new(nodes: &'a [Node<T>]) -> Self {
        let degrees: Vec<usize> = nodes.iter().map(|node| node.siblings.len()).collect();

        // An isolated vertex is only possible in a single-vertex graph, it is its own centre.
        let leaves = degrees
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree <= 1)
            .map(|(index, _)| index)
            .collect();

        Self {
            nodes,
            degrees,
            removed: vec![false; nodes.len()],
            leaves,
            remaining: nodes.len(),
        }
    }

    /// Peels layers until two or fewer vertices remain and returns them in queue order.
    fn run(mut self) -> Result<Vec<usize>> {
        let mut depth = 0;

        while self.remaining > 2 {
            if self.leaves.is_empty() {
                return Err(GraphError::Cyclic {
                    remaining: self.remaining,
                });
            }

            let peeled = self.peel_layer();
            depth += 1;
            debug!(depth, peeled, remaining = self.remaining, "peeled leaf layer");
        }

        debug_assert_eq!(self.leaves.len(), self.remaining);

        Ok(self.leaves.into())
    }

    /// Removes every current leaf and queues the vertices that become leaves as a result.
    fn peel_layer(&mut self) -> usize {
        let layer = self.leaves.len();

        for _ in 0..layer {
            let Some(leaf) = self.leaves.pop_front() else {
                break;
            };

            self.removed[leaf] = true;
            self.remaining -= 1;

            for &sibling in &self.nodes[leaf].siblings {
                if self.removed[sibling] {
                    continue;
                }

                self.degrees[sibling] -= 1;
                if self.degrees[sibling] == 1 {
                    self.leaves.push_back(sibling);
                }
            }
        }

        layer
    }
}

/// Counts the connected components by flooding from every unvisited vertex.
fn count_components<T>(nodes: &[Node<T>]) -> usize {
    let mut visited = vec![false; nodes.len()];
    let mut stack = Vec::new();
    let mut components = 0;

    for start in 0..nodes.len() {
        if visited[start] {
            continue;
        }

        components += 1;
        visited[start] = true;
        stack.push(start);

        while let Some(current) = stack.pop() {
            for &sibling in &nodes[current].siblings {
                if !visited[sibling] {
                    visited[sibling] = true;
                    stack.push(sibling);
                }
            }
        }
    }

    components
}
