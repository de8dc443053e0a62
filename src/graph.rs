//! A module for building graphs out of edges.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt::{self, Debug, Display},
    hash::Hash,
};

use nalgebra::DMatrix;
use tracing::trace;

use crate::{
    center::{self, Center, CenterPolicy},
    edge::Edge,
    error::{self, GraphError, Result},
    node::{Node, NodeRef},
};

/// Decides whether an inserted edge gets linked into the adjacency lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkPolicy {
    /// Link every new edge, whether its endpoints already existed or not. Inserting an edge that
    /// is already linked is a no-op.
    #[default]
    Always,
    /// Only link an edge if this insertion created at least one of its endpoints. Edges between
    /// two existing vertices are dropped, so the result is always a forest.
    NewEndpointOnly,
}

/// An undirected graph, made up of vertices created on demand as edges are inserted.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// The vertices in the order they were created.
    nodes: Vec<Node<T>>,
    /// Maps each key to its position in `nodes`.
    index: HashMap<T, usize>,
    /// The linked edges, used to keep insertion idempotent.
    edges: HashSet<Edge<T>>,
    policy: LinkPolicy,
    /// Cache the distance matrix when possible.
    distance_matrix: Option<DMatrix<f64>>,
}

impl<T> Default for Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Creates an empty graph which links every inserted edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let graph: Graph<i32> = Graph::new();
    /// assert!(graph.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_policy(LinkPolicy::default())
    }

    /// Creates an empty graph with the given link policy.
    pub fn with_policy(policy: LinkPolicy) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: HashSet::new(),
            policy,
            distance_matrix: None,
        }
    }

    /// Builds a graph by inserting each `(from, to)` pair in turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let graph = Graph::from_edges([(1, 2), (2, 3), (3, 4)]).unwrap();
    ///
    /// assert_eq!(graph.vertex_count(), 4);
    /// assert_eq!(graph.edge_count(), 3);
    /// ```
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        Self::from_edges_with_policy(edges, LinkPolicy::default())
    }

    /// Builds a graph from `(from, to)` pairs with the given link policy.
    pub fn from_edges_with_policy<I>(edges: I, policy: LinkPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let mut graph = Self::with_policy(policy);
        for (from, to) in edges {
            graph.insert_edge(from, to)?;
        }

        Ok(graph)
    }

    /// Returns the link policy the graph was created with.
    pub fn link_policy(&self) -> LinkPolicy {
        self.policy
    }

    /// Inserts an edge between `from` and `to`, creating either vertex if it doesn't exist yet.
    ///
    /// Returns the keys of the vertices created by this call, `from` first. Whether the two
    /// vertices get linked depends on the graph's [`LinkPolicy`]. Self loops are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert_eq!(graph.insert_edge(1, 4).unwrap(), vec![1, 4]);
    /// assert_eq!(graph.insert_edge(2, 4).unwrap(), vec![2]);
    /// assert!(graph.insert_edge(2, 4).unwrap().is_empty());
    /// assert!(graph.insert_edge(3, 3).is_err());
    /// ```
    pub fn insert_edge(&mut self, from: T, to: T) -> Result<Vec<T>> {
        if from == to {
            return Err(GraphError::SelfLoop(error::key(&from)));
        }

        // Resolve both ends first, link second.
        let mut created = Vec::with_capacity(2);
        let (i, is_new) = self.resolve(from);
        if is_new {
            created.push(from);
        }
        let (j, is_new) = self.resolve(to);
        if is_new {
            created.push(to);
        }

        let should_link = match self.policy {
            LinkPolicy::Always => true,
            LinkPolicy::NewEndpointOnly => !created.is_empty(),
        };

        let is_linked = should_link && self.edges.insert(Edge::new(from, to));
        if is_linked {
            self.nodes[i].siblings.push(j);
            self.nodes[j].siblings.push(i);
            trace!(?from, ?to, "linked edge");
        }

        if is_linked || !created.is_empty() {
            self.clear_cache();
        }

        Ok(created)
    }

    /// Inserts an edge, see [`Graph::insert_edge`].
    pub fn insert(&mut self, edge: Edge<T>) -> Result<Vec<T>> {
        let (from, to) = edge.into_pair();
        self.insert_edge(from, to)
    }

    /// Adds a vertex without linking it to anything. Returns whether the vertex was created.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert!(graph.add_node(1));
    /// assert!(!graph.add_node(1));
    /// assert_eq!(graph.vertex_count(), 1);
    /// ```
    pub fn add_node(&mut self, key: T) -> bool {
        let (_, is_new) = self.resolve(key);
        if is_new {
            self.clear_cache();
        }

        is_new
    }

    /// Returns a view of the vertex with the given key.
    pub fn node(&self, key: T) -> Option<NodeRef<'_, T>> {
        self.index
            .get(&key)
            .map(|&index| NodeRef::new(self, index))
    }

    /// Iterates over the vertices in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_, T>> + Clone + '_ {
        (0..self.nodes.len()).map(move |index| NodeRef::new(self, index))
    }

    /// Returns the vertex keys in creation order.
    pub fn keys(&self) -> Vec<T> {
        self.nodes.iter().map(|node| node.key).collect()
    }

    /// Checks if the graph contains a vertex.
    pub fn contains_node(&self, key: T) -> bool {
        self.index.contains_key(&key)
    }

    /// Checks if the graph links the two ends of an edge, in either direction.
    pub fn contains_edge(&self, edge: &Edge<T>) -> bool {
        self.edges.contains(edge)
    }

    /// Returns the number of neighbours of a vertex.
    pub fn degree(&self, key: T) -> Option<usize> {
        self.node(key).map(|node| node.degree())
    }

    /// Returns the vertex count of the graph.
    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Searches depth-first from `start` for the vertex keyed `target`.
    ///
    /// Neighbours are visited in link order and every vertex is visited at most once, so the
    /// search terminates on cyclic graphs too.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let graph = Graph::from_edges([(1, 2), (2, 3), (4, 5)]).unwrap();
    ///
    /// assert_eq!(graph.search(1, 3).map(|node| node.key()), Some(3));
    /// assert!(graph.search(1, 5).is_none());
    /// ```
    pub fn search(&self, start: T, target: T) -> Option<NodeRef<'_, T>> {
        let start = *self.index.get(&start)?;

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;

            if self.nodes[current].key == target {
                return Some(NodeRef::new(self, current));
            }

            // Push in reverse so the first linked neighbour is explored first.
            stack.extend(
                self.nodes[current]
                    .siblings
                    .iter()
                    .rev()
                    .filter(|&&sibling| !visited[sibling]),
            );
        }

        None
    }

    /// Checks the construction invariants: one vertex per key and symmetric adjacency.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.key) {
                return Err(GraphError::DuplicateKey(error::key(&node.key)));
            }
        }

        for (i, node) in self.nodes.iter().enumerate() {
            for &j in &node.siblings {
                if !self.nodes[j].siblings.contains(&i) {
                    return Err(GraphError::AsymmetricAdjacency {
                        from: error::key(&node.key),
                        to: error::key(&self.nodes[j].key),
                    });
                }
            }
        }

        Ok(())
    }

    /// Finds the centre of the tree, reporting both vertices of a two-vertex centre.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::center::Center;
    /// use arbor::graph::Graph;
    ///
    /// let graph = Graph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
    /// assert_eq!(graph.center().unwrap(), Center::Single(3));
    /// ```
    pub fn center(&self) -> Result<Center<T>> {
        self.center_with(CenterPolicy::default())
    }

    /// Finds the centre of the tree with the given reporting policy.
    pub fn center_with(&self, policy: CenterPolicy) -> Result<Center<T>> {
        center::find_center(self, policy)
    }

    /// Constructs the matrix of hop distances between every pair of vertices, indexed in creation
    /// order. Unreachable pairs are `f64::INFINITY`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use arbor::graph::Graph;
    ///
    /// let mut graph = Graph::from_edges([("a", "b"), ("b", "c")]).unwrap();
    /// assert_eq!(
    ///     graph.distance_matrix(),
    ///     dmatrix![0.0, 1.0, 2.0;
    ///              1.0, 0.0, 1.0;
    ///              2.0, 1.0, 0.0]
    /// );
    /// ```
    pub fn distance_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.distance_matrix.clone() {
            return matrix;
        }

        let n = self.nodes.len();
        let mut matrix = DMatrix::<f64>::from_element(n, n, f64::INFINITY);

        // One breadth-first pass per source fills a row.
        let mut queue = VecDeque::new();
        for source in 0..n {
            matrix[(source, source)] = 0.0;
            queue.push_back(source);

            while let Some(current) = queue.pop_front() {
                let distance = matrix[(source, current)];
                for &sibling in &self.nodes[current].siblings {
                    if matrix[(source, sibling)].is_infinite() {
                        matrix[(source, sibling)] = distance + 1.0;
                        queue.push_back(sibling);
                    }
                }
            }
        }

        // Cache the matrix.
        self.distance_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns the greatest distance from the vertex to any other vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::graph::Graph;
    ///
    /// let mut graph = Graph::from_edges([(1, 2), (2, 3)]).unwrap();
    ///
    /// assert_eq!(graph.eccentricity(1), Some(2.0));
    /// assert_eq!(graph.eccentricity(2), Some(1.0));
    /// assert_eq!(graph.eccentricity(7), None);
    /// ```
    pub fn eccentricity(&mut self, key: T) -> Option<f64> {
        let index = *self.index.get(&key)?;
        let matrix = self.distance_matrix();

        Some(matrix.row(index).max())
    }

    /// Returns a mapping of vertices to their eccentricity.
    pub fn eccentricities(&mut self) -> HashMap<T, f64> {
        let matrix = self.distance_matrix();

        self.nodes
            .iter()
            .zip(matrix.row_iter())
            .map(|(node, row)| (node.key, row.max()))
            .collect()
    }

    /// Returns the smallest eccentricity in the graph, `None` if it is empty.
    pub fn radius(&mut self) -> Option<f64> {
        self.eccentricities().into_values().reduce(f64::min)
    }

    //
    // Crate
    //

    pub(crate) fn node_table(&self) -> &[Node<T>] {
        &self.nodes
    }

    //
    // Private
    //

    /// Returns the index of the vertex keyed `key`, creating it if needed, along with whether it
    /// was created.
    fn resolve(&mut self, key: T) -> (usize, bool) {
        if let Some(&index) = self.index.get(&key) {
            return (index, false);
        }

        let index = self.nodes.len();
        self.nodes.push(Node::new(key));
        self.index.insert(key, index);
        trace!(?key, index, "created vertex");

        (index, true)
    }

    /// Clears the computed state.
    ///
    /// This should be called every time the graph is mutated since the cached state won't
    /// correspond to the new graph.
    fn clear_cache(&mut self) {
        self.distance_matrix = None;
    }
}

/// Renders one vertex per line, in creation order.
impl<T> Display for Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes() {
            writeln!(f, "{node}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use nalgebra::dmatrix;

    use super::*;

    macro_rules! graph {
        ($($path:expr),*) => {{
            let mut graph = Graph::new();

            $(
                let mut iter = $path.into_iter().peekable();
                while let (Some(a), Some(&b)) = (iter.next(), iter.peek()) {
                    graph.insert_edge(a, b).unwrap();
                }
            )*

            graph
        }}
    }

    fn assert_symmetric<T>(graph: &Graph<T>)
    where
        T: Copy + Eq + Hash + Ord + Debug,
    {
        for (a, b) in graph.nodes().tuple_combinations() {
            assert_eq!(
                a.siblings().contains(&b),
                b.siblings().contains(&a),
                "{:?} and {:?} disagree on adjacency",
                a.key(),
                b.key()
            );
        }
    }

    #[test]
    fn new() {
        let graph: Graph<()> = Graph::new();

        assert!(graph.is_empty());
        assert_eq!(graph.link_policy(), LinkPolicy::Always);
    }

    #[test]
    fn insert_edge_creates_missing_endpoints() {
        let mut graph = Graph::new();

        assert_eq!(graph.insert_edge(1, 4).unwrap(), vec![1, 4]);
        assert_eq!(graph.insert_edge(2, 4).unwrap(), vec![2]);
        assert_eq!(graph.insert_edge(4, 3).unwrap(), vec![3]);

        assert_eq!(graph.keys(), vec![1, 4, 2, 3]);
        assert_eq!(graph.node(4).unwrap().sibling_keys(), vec![1, 2, 3]);
    }

    #[test]
    fn insert_edge_is_idempotent() {
        let mut graph = Graph::new();

        graph.insert_edge(1, 2).unwrap();
        assert!(graph.insert_edge(1, 2).unwrap().is_empty());
        assert!(graph.insert_edge(2, 1).unwrap().is_empty());

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(1), Some(1));
        assert_eq!(graph.degree(2), Some(1));
    }

    #[test]
    fn insert_edge_links_existing_vertices() {
        let mut graph = graph!([1, 2, 3]);

        assert!(graph.insert_edge(1, 3).unwrap().is_empty());
        assert!(graph.contains_edge(&Edge::new(3, 1)));
        assert_eq!(graph.degree(1), Some(2));
        assert_symmetric(&graph);
    }

    #[test]
    fn insert_edge_new_endpoint_only() {
        let mut graph = Graph::with_policy(LinkPolicy::NewEndpointOnly);
        graph.insert_edge(1, 2).unwrap();
        graph.insert_edge(2, 3).unwrap();

        // Both ends exist already, the edge is dropped.
        assert!(graph.insert_edge(1, 3).unwrap().is_empty());
        assert!(!graph.contains_edge(&Edge::new(1, 3)));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(1), Some(1));

        // A declared but unlinked vertex counts as existing.
        graph.add_node(4);
        assert!(graph.insert_edge(4, 1).unwrap().is_empty());
        assert_eq!(graph.degree(4), Some(0));
    }

    #[test]
    fn insert_edge_rejects_self_loop() {
        let mut graph = Graph::new();

        assert_eq!(
            graph.insert_edge(3, 3),
            Err(GraphError::SelfLoop("3".to_string()))
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn insert() {
        let mut graph = Graph::new();

        assert_eq!(graph.insert(Edge::new("a", "b")).unwrap(), vec!["a", "b"]);
        assert!(graph.contains_edge(&Edge::new("b", "a")));
    }

    #[test]
    fn from_edges_propagates_errors() {
        let result = Graph::from_edges([(1, 2), (2, 2), (2, 3)]);

        assert_eq!(result.unwrap_err(), GraphError::SelfLoop("2".to_string()));
    }

    #[test]
    fn no_duplicate_vertices() {
        let graph = graph!([1, 2, 3, 1], [2, 4, 2], [3, 1]);

        let keys = graph.keys();
        assert_eq!(keys.iter().unique().count(), keys.len());
        assert_eq!(graph.vertex_count(), 4);
        graph.validate().unwrap();
    }

    #[test]
    fn adjacency_is_symmetric() {
        let graph = graph!([1, 2, 3, 4, 1], [2, 5], [6, 3]);

        assert_symmetric(&graph);
        graph.validate().unwrap();
    }

    #[test]
    fn nodes_in_creation_order() {
        let graph = graph!([3, 1, 2]);
        let nodes = graph.nodes();

        assert_eq!(nodes.clone().map(|node| node.key()).collect_vec(), vec![3, 1, 2]);
        assert_eq!(nodes.tuple_combinations::<(_, _)>().count(), 3);
    }

    #[test]
    fn contains_node() {
        let mut graph = Graph::new();
        graph.insert_edge("a", "b").unwrap();

        assert!(graph.contains_node("a"));
        assert!(!graph.contains_node("c"));
    }

    #[test]
    fn search() {
        let graph = graph!([1, 2, 3], [2, 4, 5], [6, 7]);

        assert_eq!(graph.search(1, 5).unwrap().key(), 5);
        assert_eq!(graph.search(5, 1).unwrap().key(), 1);
        assert_eq!(graph.search(3, 3).unwrap().key(), 3);
        assert!(graph.search(1, 7).is_none());
        assert!(graph.search(9, 1).is_none());
    }

    #[test]
    fn search_terminates_on_cycles() {
        let graph = graph!([1, 2, 3, 1], [3, 4]);

        assert_eq!(graph.search(2, 4).unwrap().key(), 4);
        assert!(graph.search(2, 9).is_none());
    }

    #[test]
    fn validate_duplicate_key() {
        let mut graph = graph!([1, 2]);
        graph.nodes.push(Node::new(1));

        assert_eq!(
            graph.validate(),
            Err(GraphError::DuplicateKey("1".to_string()))
        );
    }

    #[test]
    fn validate_asymmetric_adjacency() {
        let mut graph = graph!([1, 2, 3]);
        // Drop the 2 -> 3 half of the link.
        graph.nodes[1].siblings.retain(|&sibling| sibling != 2);

        assert_eq!(
            graph.validate(),
            Err(GraphError::AsymmetricAdjacency {
                from: "3".to_string(),
                to: "2".to_string(),
            })
        );
    }

    #[test]
    fn display() {
        let graph = graph!([1, 4, 5], [2, 4]);

        assert_eq!(graph.to_string(), "1: 4\n4: 1,5,2\n5: 4\n2: 4\n");
    }

    #[test]
    fn distance_matrix() {
        let mut graph = Graph::new();
        assert_eq!(graph.distance_matrix(), dmatrix![]);

        graph.insert_edge("a", "b").unwrap();
        assert_eq!(
            graph.distance_matrix(),
            dmatrix![0.0, 1.0;
                     1.0, 0.0]
        );

        graph.insert_edge("c", "d").unwrap();
        let matrix = graph.distance_matrix();
        assert_eq!(matrix[(0, 1)], 1.0);
        assert_eq!(matrix[(2, 3)], 1.0);
        assert!(matrix[(0, 2)].is_infinite());
    }

    #[test]
    fn eccentricities() {
        let mut graph = graph!([1, 2, 3, 4]);

        let eccentricities = graph.eccentricities();
        assert_eq!(eccentricities.get_key_value(&1), Some((&1, &3.0)));
        assert_eq!(eccentricities.get_key_value(&2), Some((&2, &2.0)));
        assert_eq!(eccentricities.get_key_value(&3), Some((&3, &2.0)));
        assert_eq!(eccentricities.get_key_value(&4), Some((&4, &3.0)));

        // Sanity check the length.
        assert_eq!(eccentricities.len(), 4);
    }

    #[test]
    fn radius() {
        let mut graph = Graph::new();
        assert_eq!(graph.radius(), None);

        graph.add_node(1);
        assert_eq!(graph.radius(), Some(0.0));

        graph.insert_edge(1, 2).unwrap();
        graph.insert_edge(2, 3).unwrap();
        assert_eq!(graph.radius(), Some(1.0));
    }

    //
    // Private
    //

    #[test]
    fn clear_cache_on_insert() {
        let mut graph = graph!([1, 2]);
        graph.distance_matrix();
        assert!(graph.distance_matrix.is_some());

        graph.insert_edge(2, 3).unwrap();
        assert!(graph.distance_matrix.is_none());
    }

    #[test]
    fn clear_cache_on_add_node() {
        let mut graph = graph!([1, 2]);
        graph.distance_matrix();

        // Existing vertices leave the cache alone.
        graph.add_node(1);
        assert!(graph.distance_matrix.is_some());

        graph.add_node(3);
        assert!(graph.distance_matrix.is_none());
    }

    #[test]
    fn keep_cache_on_duplicate_insert() {
        let mut graph = graph!([1, 2]);
        graph.distance_matrix();

        graph.insert_edge(2, 1).unwrap();
        assert!(graph.distance_matrix.is_some());
    }
}
