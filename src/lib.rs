//! Grapher - 有向带权图与经典图算法
//!
//! - 图数据结构：顶点表、出边表与同步维护的邻接矩阵
//! - 路径搜索：BFS、DFS
//! - 最短路径：Bellman-Ford、Dijkstra、Floyd-Warshall
//! - 最大流：Ford-Fulkerson（DFS / BFS 增广）
//! - CSV、JSON Lines 边列表导入

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod types;

// 重导出常用类型
pub use algorithm::{FordFulkerson, MaxFlow, PathFinder, ShortestPath};
pub use error::{Error, Result};
pub use graph::{AdjacencyMatrix, DistanceMatrix, Edge, FlowMatrix, Graph, Vertex, VertexId};
pub use types::{
    EdgeInput, PropertyValue, VertexInput, Weight, DEFAULT_MAX_VERTICES, DEFAULT_WEIGHT,
};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
