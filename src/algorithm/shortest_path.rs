//! 带权最短路径算法
//!
//! - Bellman-Ford：允许负权，检测可达负环
//! - Dijkstra：非负权，基于可寻址优先队列
//! - Floyd-Warshall：全源最短距离矩阵

use crate::error::{Error, Result};
use crate::graph::{DistanceMatrix, Graph, VertexId};
use crate::types::Weight;
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};
use tracing::{debug, trace, warn};

/// 优先队列中的距离（按 `total_cmp` 全序比较）
#[derive(Debug, Clone, Copy, PartialEq)]
struct Distance(Weight);

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// 单源搜索的结果：距离与前驱，均按 ID - 1 下标
struct Relaxation {
    distance: Vec<Weight>,
    parent: Vec<Option<VertexId>>,
}

impl Relaxation {
    fn new(n: usize, start: VertexId) -> Self {
        let mut distance = vec![Weight::INFINITY; n];
        distance[start.index()] = 0.0;
        Self {
            distance,
            parent: vec![None; n],
        }
    }

    fn distance(&self, id: VertexId) -> Weight {
        self.distance[id.index()]
    }

    /// 松弛边 u -> v，距离严格减小时返回 true
    fn relax(&mut self, u: VertexId, v: VertexId, weight: Weight) -> bool {
        let through = self.distance(u) + weight;
        if self.distance(u).is_finite() && through < self.distance(v) {
            self.distance[v.index()] = through;
            self.parent[v.index()] = Some(u);
            true
        } else {
            false
        }
    }

    /// 沿前驱回溯 end -> start；end 不可达时返回空
    fn path_to(&self, start: VertexId, end: VertexId) -> Vec<VertexId> {
        if !self.distance(end).is_finite() {
            return Vec::new();
        }

        let mut path = vec![end];
        let mut current = end;
        // 前驱链长度不会超过顶点数
        for _ in 0..self.parent.len() {
            if current == start {
                path.reverse();
                return path;
            }
            match self.parent[current.index()] {
                Some(prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => break,
            }
        }

        if current == start {
            path.reverse();
            return path;
        }
        Vec::new()
    }
}

/// 最短路径计算器
pub struct ShortestPath<'a> {
    graph: &'a Graph,
}

impl<'a> ShortestPath<'a> {
    /// 创建最短路径计算器
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    // ==================== Bellman-Ford ====================

    /// Bellman-Ford 最短路径
    ///
    /// 存在从 start 可达的负环、end 不可达或顶点未知时均返回空路径。
    /// 需要区分负环时使用 [`ShortestPath::bellman_ford_distances`]。
    pub fn bellman_ford(&self, start: VertexId, end: VertexId) -> Vec<VertexId> {
        if !self.graph.does_vertex_exist(start) || !self.graph.does_vertex_exist(end) {
            return Vec::new();
        }
        match self.run_bellman_ford(start) {
            Ok(state) => state.path_to(start, end),
            Err(_) => Vec::new(),
        }
    }

    /// Bellman-Ford 单源距离（按 ID - 1 下标，不可达为 +∞）
    ///
    /// 存在从 start 可达的负环时返回 `Error::NegativeCycle`。
    pub fn bellman_ford_distances(&self, start: VertexId) -> Result<Vec<Weight>> {
        if !self.graph.does_vertex_exist(start) {
            return Err(Error::InvalidReference(format!("起点 {} 不存在", start)));
        }
        Ok(self.run_bellman_ford(start)?.distance)
    }

    fn run_bellman_ford(&self, start: VertexId) -> Result<Relaxation> {
        let n = self.graph.graph_size();
        let mut state = Relaxation::new(n, start);

        // 最多 V - 1 轮，某轮无更新即可提前结束
        for pass in 1..n {
            let mut changed = false;
            for edge in self.graph.edges() {
                changed |= state.relax(edge.src(), edge.dst(), edge.weight());
            }
            trace!("Bellman-Ford 第 {} 轮, 有更新: {}", pass, changed);
            if !changed {
                debug!("Bellman-Ford 在第 {} 轮收敛", pass);
                break;
            }
        }

        // 第 V 轮仍可松弛说明存在可达负环
        for edge in self.graph.edges() {
            let (u, v) = (edge.src(), edge.dst());
            if state.distance(u).is_finite()
                && state.distance(u) + edge.weight() < state.distance(v)
            {
                warn!("检测到从 {} 可达的负环 (边 {})", start, edge);
                return Err(Error::NegativeCycle(start.as_u64()));
            }
        }

        Ok(state)
    }

    // ==================== Dijkstra ====================

    /// Dijkstra 最短路径；end 不可达或顶点未知时返回空路径
    ///
    /// 假定边权非负，遇到负权只记录警告。
    pub fn dijkstra(&self, start: VertexId, end: VertexId) -> Vec<VertexId> {
        if !self.graph.does_vertex_exist(start) || !self.graph.does_vertex_exist(end) {
            return Vec::new();
        }
        self.run_dijkstra(start, Some(end)).path_to(start, end)
    }

    /// Dijkstra 单源距离（按 ID - 1 下标，不可达为 +∞）；未知起点时全部为 +∞
    pub fn dijkstra_distances(&self, start: VertexId) -> Vec<Weight> {
        if !self.graph.does_vertex_exist(start) {
            return vec![Weight::INFINITY; self.graph.graph_size()];
        }
        self.run_dijkstra(start, None).distance
    }

    fn run_dijkstra(&self, start: VertexId, target: Option<VertexId>) -> Relaxation {
        if self.graph.edges().any(|e| e.weight() < 0.0) {
            warn!("Dijkstra 遇到负权边, 结果可能不是最短路径");
        }

        let mut state = Relaxation::new(self.graph.graph_size(), start);

        // 待定集合：全部顶点，距离相同时 ID 小者优先
        let mut pending: PriorityQueue<VertexId, Reverse<(Distance, VertexId)>> =
            PriorityQueue::with_capacity(self.graph.graph_size());
        for id in self.graph.vertex_ids() {
            pending.push(id, Reverse((Distance(state.distance(id)), id)));
        }

        while let Some((current, Reverse((Distance(d), _)))) = pending.pop() {
            // 剩余顶点全部不可达
            if !d.is_finite() {
                break;
            }
            trace!("Dijkstra 选中顶点 {} (距离 {})", current, d);
            if target == Some(current) {
                break;
            }

            for edge in self.graph.get_neighbours(current) {
                let next = edge.dst();
                if pending.get_priority(&next).is_none() {
                    continue;
                }
                if state.relax(current, next, edge.weight()) {
                    pending.change_priority(&next, Reverse((Distance(state.distance(next)), next)));
                }
            }
        }

        state
    }

    // ==================== Floyd-Warshall ====================

    /// Floyd-Warshall 全源最短距离
    ///
    /// 返回 N×N 矩阵，(i, j) 为 (i+1) -> (j+1) 的最短距离，不可达为 +∞，对角线为 0。
    pub fn floyd_warshall(&self) -> DistanceMatrix {
        let n = self.graph.graph_size();
        let mut dist = DistanceMatrix::filled(n, Weight::INFINITY);

        for edge in self.graph.edges() {
            dist[(edge.src().index(), edge.dst().index())] = edge.weight();
        }
        for i in 0..n {
            dist[(i, i)] = 0.0;
        }

        for m in 0..n {
            for i in 0..n {
                let through_m = dist[(i, m)];
                if !through_m.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = through_m + dist[(m, j)];
                    if candidate < dist[(i, j)] {
                        dist[(i, j)] = candidate;
                    }
                }
            }
        }

        debug!("Floyd-Warshall 完成: {}×{}", n, n);
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<VertexId> {
        raw.iter().map(|&id| VertexId(id)).collect()
    }

    /// 3 -> 7 权重很大，较轻的路线为 3 -> 4 -> 5 -> 6 -> 7
    fn create_test_graph() -> Graph {
        Graph::new(
            1..=7u64,
            vec![
                (1, 2, 2.0),
                (1, 3, 4.0),
                (2, 4, 3.0),
                (3, 4, 1.0),
                (3, 7, 5000.0),
                (4, 5, 7.0),
                (5, 6, 2.0),
                (6, 7, 1.0),
                (7, 4, 3.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_bellman_ford_and_dijkstra_agree() {
        let graph = create_test_graph();
        let sp = ShortestPath::new(&graph);

        let bf = sp.bellman_ford(VertexId(1), VertexId(7));
        let dj = sp.dijkstra(VertexId(1), VertexId(7));

        assert_eq!(graph.path_weight(&bf), Some(15.0));
        assert_eq!(graph.path_weight(&dj), Some(15.0));
        for path in [&bf, &dj] {
            assert!(!path
                .windows(2)
                .any(|p| p[0] == VertexId(3) && p[1] == VertexId(7)));
        }
    }

    #[test]
    fn test_dijkstra_tie_break() {
        // 1 -> 2 -> 4 与 1 -> 3 -> 4 等长，ID 小的 2 先出队
        let graph = Graph::new(
            1..=4u64,
            vec![(1, 3, 1.0), (1, 2, 1.0), (2, 4, 1.0), (3, 4, 1.0)],
        )
        .unwrap();
        let sp = ShortestPath::new(&graph);

        assert_eq!(sp.dijkstra(VertexId(1), VertexId(4)), ids(&[1, 2, 4]));
    }

    #[test]
    fn test_distances() {
        let graph = create_test_graph();
        let sp = ShortestPath::new(&graph);

        let expected = vec![0.0, 2.0, 4.0, 5.0, 12.0, 14.0, 15.0];
        assert_eq!(sp.bellman_ford_distances(VertexId(1)).unwrap(), expected);
        assert_eq!(sp.dijkstra_distances(VertexId(1)), expected);

        let from_7 = sp.dijkstra_distances(VertexId(7));
        assert!(from_7[0].is_infinite());
        assert_eq!(from_7[3], 3.0);
    }

    #[test]
    fn test_unreachable_returns_empty() {
        let graph = Graph::new(1..=2u64, Vec::<(u64, u64)>::new()).unwrap();
        let sp = ShortestPath::new(&graph);

        assert!(sp.bellman_ford(VertexId(1), VertexId(2)).is_empty());
        assert!(sp.dijkstra(VertexId(1), VertexId(2)).is_empty());
        assert!(sp.floyd_warshall()[(0, 1)].is_infinite());
    }

    #[test]
    fn test_start_equals_end() {
        let graph = create_test_graph();
        let sp = ShortestPath::new(&graph);

        assert_eq!(sp.bellman_ford(VertexId(4), VertexId(4)), ids(&[4]));
        assert_eq!(sp.dijkstra(VertexId(4), VertexId(4)), ids(&[4]));
    }

    #[test]
    fn test_unknown_vertices() {
        let graph = create_test_graph();
        let sp = ShortestPath::new(&graph);

        assert!(sp.bellman_ford(VertexId(1), VertexId(99)).is_empty());
        assert!(sp.dijkstra(VertexId(99), VertexId(1)).is_empty());
        assert!(matches!(
            sp.bellman_ford_distances(VertexId(0)),
            Err(Error::InvalidReference(_))
        ));
        assert!(sp
            .dijkstra_distances(VertexId(99))
            .iter()
            .all(|d| d.is_infinite()));
    }

    #[test]
    fn test_negative_weights() {
        let graph = Graph::new(
            1..=4u64,
            vec![(1, 2, 4.0), (1, 3, 1.0), (3, 2, -2.0), (2, 4, 1.0)],
        )
        .unwrap();
        let sp = ShortestPath::new(&graph);

        assert_eq!(sp.bellman_ford(VertexId(1), VertexId(4)), ids(&[1, 3, 2, 4]));
        assert_eq!(
            sp.bellman_ford_distances(VertexId(1)).unwrap(),
            vec![0.0, -1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_negative_cycle() {
        // 2 -> 3 -> 2 总权重 -1
        let graph = Graph::new(
            1..=4u64,
            vec![(1, 2, 1.0), (2, 3, 1.0), (3, 2, -2.0), (3, 4, 1.0)],
        )
        .unwrap();
        let sp = ShortestPath::new(&graph);

        assert!(sp.bellman_ford(VertexId(1), VertexId(4)).is_empty());
        assert!(matches!(
            sp.bellman_ford_distances(VertexId(1)),
            Err(Error::NegativeCycle(1))
        ));

        // 从 4 出发负环不可达
        assert_eq!(sp.bellman_ford(VertexId(4), VertexId(4)), ids(&[4]));
        assert!(sp.bellman_ford_distances(VertexId(4)).is_ok());
    }

    #[test]
    fn test_floyd_warshall() {
        let graph = create_test_graph();
        let sp = ShortestPath::new(&graph);
        let dist = sp.floyd_warshall();

        assert_eq!(dist.dimension(), 7);
        for i in 0..7 {
            assert_eq!(dist[(i, i)], 0.0);
        }
        assert_eq!(dist[(0, 6)], 15.0);
        assert_eq!(dist[(2, 6)], 11.0);
        assert_eq!(dist[(6, 5)], 12.0);
        assert!(dist[(6, 0)].is_infinite());

        let from_1 = sp.dijkstra_distances(VertexId(1));
        assert_eq!(dist.row(0), from_1.as_slice());
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::empty();
        let sp = ShortestPath::new(&graph);

        assert_eq!(sp.floyd_warshall().dimension(), 0);
        assert!(sp.dijkstra(VertexId(1), VertexId(1)).is_empty());
    }
}
