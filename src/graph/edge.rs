//! 边定义

use crate::graph::vertex::VertexId;
use crate::types::{Weight, DEFAULT_WEIGHT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 有向带权边
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 源顶点 ID
    src: VertexId,
    /// 目标顶点 ID
    dst: VertexId,
    /// 权重（容量或距离）
    weight: Weight,
}

impl Edge {
    /// 创建新边
    pub fn new(src: VertexId, dst: VertexId, weight: Weight) -> Self {
        Self { src, dst, weight }
    }

    /// 创建默认权重的边
    pub fn unweighted(src: VertexId, dst: VertexId) -> Self {
        Self::new(src, dst, DEFAULT_WEIGHT)
    }

    /// 获取源顶点 ID
    pub fn src(&self) -> VertexId {
        self.src
    }

    /// 获取目标顶点 ID
    pub fn dst(&self) -> VertexId {
        self.dst
    }

    /// 获取边的权重
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// 是否为自环
    pub fn is_loop(&self) -> bool {
        self.src == self.dst
    }

    /// 反向边
    pub fn reversed(&self) -> Self {
        Self::new(self.dst, self.src, self.weight)
    }

    pub(crate) fn set_weight(&mut self, weight: Weight) {
        self.weight = weight;
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.src, self.dst, self.weight)
    }
}
