//! Arbor is a small toolkit for building trees out of edge lists and finding their centre, the
//! vertex (or pair of adjacent vertices) whose furthest vertex is as close as possible.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure, which creates vertices
//! on demand as edges are inserted. Once built, the centre is found by repeatedly peeling off the
//! leaves of the tree.
//!
//! ```rust
//! use arbor::center::{Center, CenterPolicy};
//! use arbor::graph::Graph;
//!
//! // Insert some edges, the keys can be any type that is `Copy + Eq + Hash + Ord + Debug`.
//! let mut graph = Graph::new();
//! graph.insert_edge(1, 2).unwrap();
//! graph.insert_edge(2, 3).unwrap();
//! graph.insert_edge(3, 4).unwrap();
//!
//! // Paths with an even number of vertices have two centres...
//! assert_eq!(graph.center().unwrap(), Center::Pair(2, 3));
//! // ...unless a single one is asked for.
//! assert_eq!(graph.center_with(CenterPolicy::Collapse).unwrap(), Center::Single(3));
//!
//! // Vertices can be pretty printed as their adjacency list...
//! println!("{graph}");
//! // ...outputs:
//! // 1: 2
//! // 2: 1,3
//! // 3: 2,4
//! // 4: 3
//! ```

pub mod center;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;

pub use center::{find_center, Center, CenterPolicy};
pub use error::{GraphError, Result};
pub use graph::{Graph, LinkPolicy};
