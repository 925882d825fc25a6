//! 命令行支持
//!
//! 把一次查询（遍历、最短路径、最大流等）作用在图上，并格式化输出

mod printer;

pub use printer::{format_weight, OutputMode, Printer};

use crate::algorithm::{bfs, dfs, AugmentingPath, FordFulkerson, ShortestPath};
use crate::error::Result;
use crate::graph::{Graph, VertexId};
use tracing::debug;

/// 一次图查询
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    /// 图统计
    Info,
    /// 广度优先路径
    Bfs { start: VertexId, end: VertexId },
    /// 深度优先路径
    Dfs { start: VertexId, end: VertexId },
    /// Bellman-Ford 最短路径
    BellmanFord { start: VertexId, end: VertexId },
    /// Dijkstra 最短路径
    Dijkstra { start: VertexId, end: VertexId },
    /// 全源最短距离矩阵
    FloydWarshall,
    /// 最大流
    MaxFlow {
        source: VertexId,
        sink: VertexId,
        strategy: AugmentingPath,
    },
}

/// 执行查询并返回格式化后的输出
pub fn execute(graph: &Graph, query: Query, printer: &Printer) -> Result<String> {
    debug!("执行查询: {:?}", query);

    match query {
        Query::Info => printer.print_stats(graph),
        Query::Bfs { start, end } => {
            let path = bfs(graph, start, end);
            printer.print_path("bfs", start, end, &path, graph.path_weight(&path))
        }
        Query::Dfs { start, end } => {
            let path = dfs(graph, start, end);
            printer.print_path("dfs", start, end, &path, graph.path_weight(&path))
        }
        Query::BellmanFord { start, end } => {
            let path = ShortestPath::new(graph).bellman_ford(start, end);
            printer.print_path("bellman-ford", start, end, &path, graph.path_weight(&path))
        }
        Query::Dijkstra { start, end } => {
            let path = ShortestPath::new(graph).dijkstra(start, end);
            printer.print_path("dijkstra", start, end, &path, graph.path_weight(&path))
        }
        Query::FloydWarshall => {
            let distances = ShortestPath::new(graph).floyd_warshall();
            printer.print_matrix(&distances)
        }
        Query::MaxFlow {
            source,
            sink,
            strategy,
        } => {
            let result = FordFulkerson::new(graph)
                .with_strategy(strategy)
                .max_flow(source, sink)?;
            printer.print_max_flow(source, sink, &result, graph)
        }
    }
}
