//! 图核心模块
//!
//! 定义顶点、边、方阵和图的核心数据结构

mod edge;
#[allow(clippy::module_inception)]
mod graph;
mod matrix;
mod vertex;

pub use edge::Edge;
pub use graph::Graph;
pub use matrix::{AdjacencyMatrix, DistanceMatrix, FlowMatrix, SquareMatrix};
pub use vertex::{Vertex, VertexId};
