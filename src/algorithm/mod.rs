//! 图算法模块
//!
//! 包含路径搜索、最短路径和最大流算法

mod max_flow;
mod shortest_path;
mod traversal;

pub use max_flow::{AugmentingPath, FordFulkerson, MaxFlow};
pub use shortest_path::ShortestPath;
pub use traversal::{bfs, dfs, reachable_from, NeighborLookup, PathFinder};
