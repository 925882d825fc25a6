//! 集成测试公共工具：随机图生成与暴力求解

#![allow(dead_code)]

use grapher::{Graph, VertexId, Weight};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 生成随机有向图：顶点 1..=n，每对有序顶点以概率 p 连边，权重为 1..=9 的整数
pub fn random_graph(seed: u64, max_vertices: u64, p: f64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = rng.gen_range(2..=max_vertices);

    let mut edges = Vec::new();
    for s in 1..=n {
        for t in 1..=n {
            if s != t && rng.gen_bool(p) {
                edges.push((s, t, rng.gen_range(1..=9) as Weight));
            }
        }
    }

    Graph::new(1..=n, edges).unwrap()
}

/// 生成随机有向无环图：只有 s < t 的边，权重为 -5..=9 中的非零整数
///
/// 无环所以不存在负环，所有路径都是简单路径。
pub fn random_dag_with_negative_weights(seed: u64, max_vertices: u64, p: f64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = rng.gen_range(2..=max_vertices);

    let mut edges = Vec::new();
    for s in 1..=n {
        for t in s + 1..=n {
            if rng.gen_bool(p) {
                let w = loop {
                    let w: i32 = rng.gen_range(-5..=9);
                    if w != 0 {
                        break w;
                    }
                };
                edges.push((s, t, w as Weight));
            }
        }
    }

    Graph::new(1..=n, edges).unwrap()
}

/// 枚举 start -> end 的全部简单路径
pub fn all_simple_paths(graph: &Graph, start: VertexId, end: VertexId) -> Vec<Vec<VertexId>> {
    fn walk(
        graph: &Graph,
        current: VertexId,
        end: VertexId,
        path: &mut Vec<VertexId>,
        out: &mut Vec<Vec<VertexId>>,
    ) {
        if current == end {
            out.push(path.clone());
            return;
        }
        for edge in graph.get_neighbours(current) {
            let next = edge.dst();
            if !path.contains(&next) {
                path.push(next);
                walk(graph, next, end, path, out);
                path.pop();
            }
        }
    }

    let mut out = Vec::new();
    walk(graph, start, end, &mut vec![start], &mut out);
    out
}

/// 暴力最少边数
pub fn brute_min_hops(graph: &Graph, start: VertexId, end: VertexId) -> Option<usize> {
    all_simple_paths(graph, start, end)
        .iter()
        .map(|p| p.len() - 1)
        .min()
}

/// 暴力最小权重（非负权或无环时最短路径必为简单路径）
pub fn brute_min_weight(graph: &Graph, start: VertexId, end: VertexId) -> Weight {
    all_simple_paths(graph, start, end)
        .iter()
        .filter_map(|p| graph.path_weight(p))
        .fold(Weight::INFINITY, Weight::min)
}

/// 暴力最小 s-t 割：枚举所有含 s 不含 t 的顶点子集
pub fn brute_min_cut(graph: &Graph, source: VertexId, sink: VertexId) -> Weight {
    let n = graph.graph_size();
    let mut best = Weight::INFINITY;

    for mask in 0u32..(1 << n) {
        let in_s = |v: VertexId| mask & (1 << v.index()) != 0;
        if !in_s(source) || in_s(sink) {
            continue;
        }
        let capacity: Weight = graph
            .edges()
            .filter(|e| in_s(e.src()) && !in_s(e.dst()))
            .map(|e| e.weight())
            .sum();
        best = best.min(capacity);
    }

    best
}

pub fn ids(raw: &[u64]) -> Vec<VertexId> {
    raw.iter().map(|&id| VertexId(id)).collect()
}
