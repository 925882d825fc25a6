//! 路径搜索算法（BFS / DFS）
//!
//! 同时适用于 `Graph` 和原始邻接矩阵。两种搜索共用同一套流程，
//! 只是前沿（frontier）不同：队列得到 BFS，栈得到 DFS。

use crate::graph::{Graph, SquareMatrix, VertexId};
use std::collections::VecDeque;
use tracing::trace;

/// 按顶点 ID 查询出邻居的能力
pub trait NeighborLookup {
    /// 顶点数量；存在的顶点 ID 为 `1..=vertex_count()`
    fn vertex_count(&self) -> usize;

    /// 顶点是否存在
    fn contains(&self, vertex_id: VertexId) -> bool;

    /// 出邻居，按确定的顺序返回
    fn neighbors(&self, vertex_id: VertexId) -> impl Iterator<Item = VertexId> + '_;
}

impl NeighborLookup for Graph {
    fn vertex_count(&self) -> usize {
        self.graph_size()
    }

    fn contains(&self, vertex_id: VertexId) -> bool {
        self.does_vertex_exist(vertex_id)
    }

    /// 出边插入顺序
    fn neighbors(&self, vertex_id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.get_neighbours(vertex_id).iter().map(|e| e.dst())
    }
}

impl NeighborLookup for SquareMatrix {
    fn vertex_count(&self) -> usize {
        self.dimension()
    }

    fn contains(&self, vertex_id: VertexId) -> bool {
        self.position(vertex_id).is_some()
    }

    /// 非零单元格，列下标递增
    fn neighbors(&self, vertex_id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let row = match self.position(vertex_id) {
            Some(i) => self.row(i),
            None => &[][..],
        };
        row.iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0.0)
            .map(|(j, _)| VertexId::from_index(j))
    }
}

/// 搜索前沿
trait Frontier: Default {
    fn push(&mut self, vertex_id: VertexId);
    fn pop(&mut self) -> Option<VertexId>;
}

impl Frontier for VecDeque<VertexId> {
    fn push(&mut self, vertex_id: VertexId) {
        self.push_back(vertex_id);
    }

    fn pop(&mut self) -> Option<VertexId> {
        self.pop_front()
    }
}

impl Frontier for Vec<VertexId> {
    fn push(&mut self, vertex_id: VertexId) {
        Vec::push(self, vertex_id);
    }

    fn pop(&mut self) -> Option<VertexId> {
        Vec::pop(self)
    }
}

/// 广度优先搜索：返回边数最少的 start -> end 路径（含两端），不可达返回空
pub fn bfs<G: NeighborLookup + ?Sized>(graph: &G, start: VertexId, end: VertexId) -> Vec<VertexId> {
    search::<G, VecDeque<VertexId>>(graph, start, end)
}

/// 深度优先搜索（显式栈）：返回某条 start -> end 简单路径，不可达返回空
pub fn dfs<G: NeighborLookup + ?Sized>(graph: &G, start: VertexId, end: VertexId) -> Vec<VertexId> {
    search::<G, Vec<VertexId>>(graph, start, end)
}

/// 从 start 出发可达的所有顶点（含 start），按 ID 递增
pub fn reachable_from<G: NeighborLookup + ?Sized>(graph: &G, start: VertexId) -> Vec<VertexId> {
    if !graph.contains(start) {
        return Vec::new();
    }

    let mut visited = vec![false; graph.vertex_count()];
    let mut queue = VecDeque::new();
    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors(current) {
            if !std::mem::replace(&mut visited[neighbor.index()], true) {
                queue.push_back(neighbor);
            }
        }
    }

    visited
        .iter()
        .enumerate()
        .filter(|&(_, &seen)| seen)
        .map(|(i, _)| VertexId::from_index(i))
        .collect()
}

fn search<G, F>(graph: &G, start: VertexId, end: VertexId) -> Vec<VertexId>
where
    G: NeighborLookup + ?Sized,
    F: Frontier,
{
    if !graph.contains(start) || !graph.contains(end) {
        return Vec::new();
    }
    if start == end {
        return vec![start];
    }

    // 按 ID - 1 下标
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut parent: Vec<Option<VertexId>> = vec![None; n];
    let mut frontier = F::default();

    // 入队即标记
    visited[start.index()] = true;
    frontier.push(start);

    while let Some(current) = frontier.pop() {
        trace!("访问顶点 {}", current);
        for neighbor in graph.neighbors(current) {
            if std::mem::replace(&mut visited[neighbor.index()], true) {
                continue;
            }
            parent[neighbor.index()] = Some(current);
            if neighbor == end {
                return reconstruct_path(start, end, &parent);
            }
            frontier.push(neighbor);
        }
    }

    Vec::new()
}

fn reconstruct_path(
    start: VertexId,
    end: VertexId,
    parent: &[Option<VertexId>],
) -> Vec<VertexId> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        match parent[current.index()] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Vec::new(),
        }
    }

    path.reverse();
    path
}

/// 路径查找器
pub struct PathFinder<'a, G: NeighborLookup + ?Sized = Graph> {
    graph: &'a G,
}

impl<'a, G: NeighborLookup + ?Sized> PathFinder<'a, G> {
    /// 创建路径查找器
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// BFS 最短（边数）路径
    pub fn bfs(&self, start: VertexId, end: VertexId) -> Vec<VertexId> {
        bfs(self.graph, start, end)
    }

    /// DFS 路径
    pub fn dfs(&self, start: VertexId, end: VertexId) -> Vec<VertexId> {
        dfs(self.graph, start, end)
    }

    /// 检查两点是否可达
    pub fn is_reachable(&self, start: VertexId, end: VertexId) -> bool {
        !self.bfs(start, end).is_empty()
    }

    /// 从 start 可达的顶点
    pub fn reachable_from(&self, start: VertexId) -> Vec<VertexId> {
        reachable_from(self.graph, start)
    }
}
