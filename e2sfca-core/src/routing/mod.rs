//! Shortest-path search over the street network

pub mod dijkstra;

pub use dijkstra::dijkstra_path_weights;
