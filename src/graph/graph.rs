//! 图数据结构
//!
//! 顶点表 + 出边表，并维护一份与出边表同步的邻接矩阵缓存

use super::edge::Edge;
use super::matrix::AdjacencyMatrix;
use super::vertex::{Vertex, VertexId};
use crate::error::{Error, Result};
use crate::types::{EdgeInput, PropertyValue, VertexInput, Weight, DEFAULT_MAX_VERTICES};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 有向带权图
///
/// 顶点 ID 总是稠密的 `1..=N`，邻接矩阵的下标为 ID - 1。
/// 图只能增长（`add_vertex` / `add_edge`），不支持删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "GraphSnapshot", try_from = "GraphSnapshot")]
pub struct Graph {
    /// 顶点表（按 ID 递增）
    vertices: IndexMap<VertexId, Vertex>,
    /// 源顶点到出边的映射
    outgoing: IndexMap<VertexId, Vec<Edge>>,
    /// 边数量
    num_edges: usize,
    /// 邻接矩阵缓存
    adjacency_matrix: AdjacencyMatrix,
}

impl Graph {
    /// 由顶点集合与边集合构造图
    ///
    /// - 顶点可以全部是裸 ID，也可以全部是 (ID, 数据)；混用返回 `UnsupportedInput`
    /// - 重复 ID 只保留一个
    /// - 去重后的 ID 必须恰好是 `1..=N`，否则返回 `InvalidIdentifier`
    /// - 边的端点不存在时返回 `InvalidReference`
    /// - 同一 (源, 目标) 出现多次时保留最后一次的权重
    pub fn new<V, E>(
        vertices: impl IntoIterator<Item = V>,
        edges: impl IntoIterator<Item = E>,
    ) -> Result<Self>
    where
        V: Into<VertexInput>,
        E: Into<EdgeInput>,
    {
        let inputs: Vec<VertexInput> = vertices.into_iter().map(Into::into).collect();

        let with_value = inputs.iter().filter(|v| v.has_value()).count();
        if with_value != 0 && with_value != inputs.len() {
            return Err(Error::UnsupportedInput(
                "顶点集合不能混用裸 ID 与带数据的顶点".to_string(),
            ));
        }

        let mut unique: BTreeMap<u64, Option<PropertyValue>> = BTreeMap::new();
        for input in inputs {
            let raw = input.raw_id();
            VertexId::new(raw)?;
            unique.entry(raw).or_insert_with(|| input.into_value());
        }

        if let Some((expected, &actual)) = (1u64..)
            .zip(unique.keys())
            .find(|(expected, actual)| expected != *actual)
        {
            return Err(Error::InvalidIdentifier(format!(
                "顶点 ID 必须连续编号为 1..={}, 缺少 {} (遇到 {})",
                unique.len(),
                expected,
                actual
            )));
        }

        let mut graph = Self::with_capacity(unique.len());
        for (raw, value) in unique {
            let id = VertexId(raw);
            graph.vertices.insert(id, Vertex::new(id, value));
        }

        for edge in edges {
            let edge: EdgeInput = edge.into();
            let (src, dst) = graph.resolve_endpoints(edge.source(), edge.target())?;
            let weight = validate_weight(edge.weight())?;

            let list = graph.outgoing.entry(src).or_default();
            if let Some(existing) = list.iter_mut().find(|e| e.dst() == dst) {
                warn!(
                    "重复的边 {} -> {}: 权重 {} 覆盖为 {}",
                    src,
                    dst,
                    existing.weight(),
                    weight
                );
                existing.set_weight(weight);
            } else {
                list.push(Edge::new(src, dst, weight));
                graph.num_edges += 1;
            }
        }

        graph.rebuild_adjacency_matrix();

        debug!(
            "构造图: {} 个顶点, {} 条边",
            graph.graph_size(),
            graph.edge_count()
        );

        Ok(graph)
    }

    /// 由邻接矩阵构造图
    ///
    /// 生成顶点 `1..=N`，每个非零单元格生成一条边，权重为单元格的值。
    pub fn from_adjacency_matrix(rows: Vec<Vec<Weight>>) -> Result<Self> {
        let matrix = AdjacencyMatrix::from_rows(rows)?;
        let n = matrix.dimension();

        let mut edges = Vec::with_capacity(matrix.count_nonzero());
        for (i, row) in matrix.rows().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                if w != 0.0 {
                    edges.push(EdgeInput::WeightedTriple(i as u64 + 1, j as u64 + 1, w));
                }
            }
        }

        Self::new(1..=n as u64, edges)
    }

    /// 由边列表构造图，顶点集合为 `1..=最大端点`
    ///
    /// 最大端点超过 [`DEFAULT_MAX_VERTICES`] 时返回 `UnsupportedInput`，
    /// 需要更大的图时使用 [`Graph::from_edge_list_bounded`]。
    pub fn from_edge_list<E: Into<EdgeInput>>(edges: impl IntoIterator<Item = E>) -> Result<Self> {
        Self::from_edge_list_bounded(edges, DEFAULT_MAX_VERTICES)
    }

    /// 由边列表构造图，最大端点不能超过 `max_vertices`
    pub fn from_edge_list_bounded<E: Into<EdgeInput>>(
        edges: impl IntoIterator<Item = E>,
        max_vertices: u64,
    ) -> Result<Self> {
        let edges: Vec<EdgeInput> = edges.into_iter().map(Into::into).collect();
        let n = edges
            .iter()
            .map(|e| e.source().max(e.target()))
            .max()
            .unwrap_or(0);
        if n > max_vertices {
            return Err(Error::UnsupportedInput(format!(
                "端点 {} 超过顶点数上限 {}",
                n, max_vertices
            )));
        }
        Self::new(1..=n, edges)
    }

    /// 创建空图
    pub fn empty() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            vertices: IndexMap::with_capacity(n),
            outgoing: IndexMap::new(),
            num_edges: 0,
            adjacency_matrix: AdjacencyMatrix::zeros(0),
        }
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点，ID 为当前顶点数 + 1
    pub fn add_vertex(&mut self, value: Option<PropertyValue>) -> VertexId {
        let id = VertexId::from_index(self.vertices.len());
        self.vertices.insert(id, Vertex::new(id, value));
        self.adjacency_matrix.grow();
        debug!("添加顶点 {}", id);
        id
    }

    /// 顶点是否存在
    pub fn does_vertex_exist(&self, vertex_id: VertexId) -> bool {
        self.vertices.contains_key(&vertex_id)
    }

    /// 获取顶点
    pub fn vertex(&self, vertex_id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&vertex_id)
    }

    /// 获取顶点附加数据，未知 ID 返回 None
    pub fn get_vertex_data(&self, vertex_id: VertexId) -> Option<&PropertyValue> {
        self.vertices.get(&vertex_id).and_then(|v| v.value())
    }

    /// 设置顶点附加数据，返回旧值
    pub fn set_vertex_data(
        &mut self,
        vertex_id: VertexId,
        value: Option<PropertyValue>,
    ) -> Result<Option<PropertyValue>> {
        let vertex = self
            .vertices
            .get_mut(&vertex_id)
            .ok_or_else(|| Error::InvalidReference(format!("顶点 {} 不存在", vertex_id)))?;
        Ok(vertex.set_value(value))
    }

    /// 顶点数量
    pub fn graph_size(&self) -> usize {
        self.vertices.len()
    }

    /// 按 ID 递增遍历顶点
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.values()
    }

    /// 按 ID 递增遍历顶点 ID
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// 若 (源, 目标) 已有边则不做任何修改并返回 `false`。
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId, weight: Weight) -> Result<bool> {
        let (src, dst) = self.resolve_endpoints(src.as_u64(), dst.as_u64())?;
        let weight = validate_weight(weight)?;

        if self.has_edge(src, dst) {
            debug!("边 {} -> {} 已存在, 忽略", src, dst);
            return Ok(false);
        }

        self.outgoing
            .entry(src)
            .or_default()
            .push(Edge::new(src, dst, weight));
        self.adjacency_matrix.set(src.index(), dst.index(), weight);
        self.num_edges += 1;

        Ok(true)
    }

    /// 顶点的出边（未知顶点返回空）
    pub fn get_neighbours(&self, vertex_id: VertexId) -> &[Edge] {
        self.outgoing
            .get(&vertex_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 所有边：按源顶点 ID 递增，同一源内按插入顺序
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.vertices
            .keys()
            .flat_map(move |&id| self.get_neighbours(id).iter())
    }

    /// 边数量
    pub fn edge_count(&self) -> usize {
        self.num_edges
    }

    /// 是否存在边 src -> dst
    pub fn has_edge(&self, src: VertexId, dst: VertexId) -> bool {
        self.edge_weight(src, dst).is_some()
    }

    /// 边 src -> dst 的权重
    pub fn edge_weight(&self, src: VertexId, dst: VertexId) -> Option<Weight> {
        self.get_neighbours(src)
            .iter()
            .find(|e| e.dst() == dst)
            .map(|e| e.weight())
    }

    /// 出度
    pub fn out_degree(&self, vertex_id: VertexId) -> usize {
        self.get_neighbours(vertex_id).len()
    }

    /// 入度
    pub fn in_degree(&self, vertex_id: VertexId) -> usize {
        if !self.does_vertex_exist(vertex_id) {
            return 0;
        }
        let j = vertex_id.index();
        self.adjacency_matrix
            .rows()
            .filter(|row| row[j] != 0.0)
            .count()
    }

    /// 路径总权重；相邻顶点之间缺边时返回 None
    pub fn path_weight(&self, path: &[VertexId]) -> Option<Weight> {
        path.windows(2)
            .map(|pair| self.edge_weight(pair[0], pair[1]))
            .sum()
    }

    // ==================== 邻接矩阵 ====================

    /// 邻接矩阵（副本）
    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        self.adjacency_matrix.clone()
    }

    fn rebuild_adjacency_matrix(&mut self) {
        let mut matrix = AdjacencyMatrix::zeros(self.vertices.len());
        for edge in self.outgoing.values().flatten() {
            matrix.set(edge.src().index(), edge.dst().index(), edge.weight());
        }
        self.adjacency_matrix = matrix;
    }

    fn resolve_endpoints(&self, src: u64, dst: u64) -> Result<(VertexId, VertexId)> {
        let src = VertexId(src);
        let dst = VertexId(dst);
        if !self.does_vertex_exist(src) {
            return Err(Error::InvalidReference(format!("源顶点 {} 不存在", src)));
        }
        if !self.does_vertex_exist(dst) {
            return Err(Error::InvalidReference(format!("目标顶点 {} 不存在", dst)));
        }
        Ok((src, dst))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::empty()
    }
}

/// 0 是邻接矩阵中的"无边"标记，不能作为真实权重
fn validate_weight(weight: Weight) -> Result<Weight> {
    if !weight.is_finite() {
        return Err(Error::UnsupportedInput(format!(
            "边权必须是有限数, 实际为 {}",
            weight
        )));
    }
    if weight == 0.0 {
        return Err(Error::UnsupportedInput(
            "边权不能为 0 (邻接矩阵以 0 表示无边)".to_string(),
        ));
    }
    Ok(weight)
}

/// 序列化形式：顶点列表 + 边列表
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphSnapshot {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl From<Graph> for GraphSnapshot {
    fn from(graph: Graph) -> Self {
        let edges = graph.edges().copied().collect();
        Self {
            vertices: graph.vertices.into_values().collect(),
            edges,
        }
    }
}

impl TryFrom<GraphSnapshot> for Graph {
    type Error = Error;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self> {
        let vertices: Vec<VertexInput> = snapshot
            .vertices
            .into_iter()
            .map(|v| match v.value() {
                Some(value) => VertexInput::IdentifierWithValue(v.id().as_u64(), value.clone()),
                None => VertexInput::IdentifierWithValue(v.id().as_u64(), PropertyValue::Null),
            })
            .collect();
        let edges = snapshot.edges.into_iter().map(|e| {
            EdgeInput::WeightedTriple(e.src().as_u64(), e.dst().as_u64(), e.weight())
        });

        let mut graph = Self::new(vertices, edges)?;
        // Null 只是占位，还原为"无数据"
        for vertex in graph.vertices.values_mut() {
            if vertex.value() == Some(&PropertyValue::Null) {
                vertex.set_value(None);
            }
        }
        Ok(graph)
    }
}
