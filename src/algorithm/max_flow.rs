//! 最大流算法
//!
//! Ford-Fulkerson：在残余网络上反复寻找增广路径。
//! 默认用 DFS 寻找增广路径；改用 BFS 即为 Edmonds-Karp。

use super::traversal::{bfs, dfs, reachable_from};
use crate::error::{Error, Result};
use crate::graph::{Edge, FlowMatrix, Graph, VertexId};
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, trace};

/// 增广路径的搜索方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AugmentingPath {
    /// 深度优先（经典 Ford-Fulkerson）
    #[default]
    DepthFirst,
    /// 广度优先（Edmonds-Karp，增广次数有多项式上界）
    BreadthFirst,
}

/// 最大流结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: Weight,
    /// 流量矩阵，flow[u][v] = -flow[v][u]
    pub flow: FlowMatrix,
    /// 最小割的源侧顶点集（残余网络中从源点可达的顶点，按 ID 递增）
    pub source_side: Vec<VertexId>,
    /// 增广次数
    pub augmentations: usize,
}

impl MaxFlow {
    /// 边 u -> v 上的净流量，未知顶点为 0
    pub fn flow_between(&self, u: VertexId, v: VertexId) -> Weight {
        match (self.flow.position(u), self.flow.position(v)) {
            (Some(i), Some(j)) => self.flow[(i, j)],
            _ => 0.0,
        }
    }

    /// 跨越最小割的原图边（全部饱和），其容量之和等于最大流
    pub fn cut_edges(&self, graph: &Graph) -> Vec<Edge> {
        let source_side: HashSet<VertexId> = self.source_side.iter().copied().collect();
        graph
            .edges()
            .filter(|e| source_side.contains(&e.src()) && !source_side.contains(&e.dst()))
            .copied()
            .collect()
    }
}

/// Ford-Fulkerson 最大流算法
pub struct FordFulkerson<'a> {
    graph: &'a Graph,
    strategy: AugmentingPath,
}

impl<'a> FordFulkerson<'a> {
    /// 创建算法实例（DFS 增广）
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            strategy: AugmentingPath::default(),
        }
    }

    /// 设置增广路径搜索方式
    pub fn with_strategy(mut self, strategy: AugmentingPath) -> Self {
        self.strategy = strategy;
        self
    }

    /// 计算从 source 到 sink 的最大流
    ///
    /// 容量取自邻接矩阵。源点或汇点不存在返回 `InvalidReference`，
    /// 源汇相同或存在负容量返回 `UnsupportedInput`。
    pub fn max_flow(&self, source: VertexId, sink: VertexId) -> Result<MaxFlow> {
        self.validate(source, sink)?;

        let capacity = self.graph.adjacency_matrix();
        let n = capacity.dimension();

        let mut residual = capacity;
        let mut flow = FlowMatrix::zeros(n);
        let mut value = 0.0;
        let mut augmentations = 0;

        loop {
            let path = match self.strategy {
                AugmentingPath::DepthFirst => dfs(&residual, source, sink),
                AugmentingPath::BreadthFirst => bfs(&residual, source, sink),
            };
            if path.is_empty() {
                break;
            }

            let bottleneck = path
                .windows(2)
                .map(|p| residual[(p[0].index(), p[1].index())])
                .fold(Weight::INFINITY, Weight::min);

            for p in path.windows(2) {
                let (u, v) = (p[0].index(), p[1].index());
                residual[(u, v)] -= bottleneck;
                residual[(v, u)] += bottleneck;
                flow[(u, v)] += bottleneck;
                flow[(v, u)] = -flow[(u, v)];
            }

            value += bottleneck;
            augmentations += 1;
            trace!("增广路径 {:?}, 瓶颈 {}", path, bottleneck);
        }

        let source_side = reachable_from(&residual, source);

        info!(
            "最大流 {} -> {}: {} ({} 次增广, {:?})",
            source, sink, value, augmentations, self.strategy
        );
        debug!("最小割源侧: {:?}", source_side);

        Ok(MaxFlow {
            value,
            flow,
            source_side,
            augmentations,
        })
    }

    fn validate(&self, source: VertexId, sink: VertexId) -> Result<()> {
        if !self.graph.does_vertex_exist(source) {
            return Err(Error::InvalidReference(format!("源点 {} 不存在", source)));
        }
        if !self.graph.does_vertex_exist(sink) {
            return Err(Error::InvalidReference(format!("汇点 {} 不存在", sink)));
        }
        if source == sink {
            return Err(Error::UnsupportedInput(format!(
                "源点与汇点不能相同: {}",
                source
            )));
        }
        if let Some(edge) = self.graph.edges().find(|e| e.weight() < 0.0) {
            return Err(Error::UnsupportedInput(format!(
                "容量不能为负: {}",
                edge
            )));
        }
        Ok(())
    }
}
