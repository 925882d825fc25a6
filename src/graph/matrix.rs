//! 方阵
//!
//! 邻接矩阵、距离矩阵和流量矩阵的共同表示。
//! 行列下标为顶点 ID - 1；在邻接矩阵中 0 表示"无边"。

use crate::error::{Error, Result};
use crate::graph::vertex::VertexId;
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// N×N 权重矩阵
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Weight>>", into = "Vec<Vec<Weight>>")]
pub struct SquareMatrix {
    rows: Vec<Vec<Weight>>,
}

/// 邻接矩阵：cell(i, j) 为边 (i+1)->(j+1) 的权重，0 表示无边
pub type AdjacencyMatrix = SquareMatrix;

/// 全源最短距离矩阵：不可达为 +∞
pub type DistanceMatrix = SquareMatrix;

/// 流量矩阵：flow[u][v] = -flow[v][u]
pub type FlowMatrix = SquareMatrix;

impl SquareMatrix {
    /// 创建全零矩阵
    pub fn zeros(n: usize) -> Self {
        Self::filled(n, 0.0)
    }

    /// 创建全部填充为 `value` 的矩阵
    pub fn filled(n: usize, value: Weight) -> Self {
        Self {
            rows: vec![vec![value; n]; n],
        }
    }

    /// 从行向量创建，要求是方阵
    pub fn from_rows(rows: Vec<Vec<Weight>>) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::UnsupportedInput(format!(
                "矩阵必须是方阵: 共 {} 行, 第 {} 行有 {} 列",
                n,
                i + 1,
                row.len()
            )));
        }
        Ok(Self { rows })
    }

    /// 维度 N
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 读取单元格
    pub fn get(&self, i: usize, j: usize) -> Weight {
        self.rows[i][j]
    }

    /// 写入单元格
    pub fn set(&mut self, i: usize, j: usize, value: Weight) {
        self.rows[i][j] = value;
    }

    /// 顶点 ID 对应的下标；ID 为 0 或超出维度时返回 None
    pub fn position(&self, vertex_id: VertexId) -> Option<usize> {
        vertex_id.checked_index().filter(|&i| i < self.dimension())
    }

    /// 按顶点 ID 读取边权，0 或越界返回 None
    pub fn weight(&self, src: VertexId, dst: VertexId) -> Option<Weight> {
        let w = self.rows[self.position(src)?][self.position(dst)?];
        (w != 0.0).then_some(w)
    }

    /// 第 i 行
    pub fn row(&self, i: usize) -> &[Weight] {
        &self.rows[i]
    }

    /// 所有行
    pub fn rows(&self) -> impl Iterator<Item = &[Weight]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// 增加一行一列（全零）
    pub fn grow(&mut self) {
        for row in self.rows.iter_mut() {
            row.push(0.0);
        }
        let n = self.rows.len() + 1;
        self.rows.push(vec![0.0; n]);
    }

    /// 非零单元格数量
    pub fn count_nonzero(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&w| w != 0.0).count())
            .sum()
    }

    /// 转为行向量
    pub fn into_rows(self) -> Vec<Vec<Weight>> {
        self.rows
    }
}

impl TryFrom<Vec<Vec<Weight>>> for SquareMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<Weight>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<SquareMatrix> for Vec<Vec<Weight>> {
    fn from(matrix: SquareMatrix) -> Self {
        matrix.rows
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = Weight;

    fn index(&self, (i, j): (usize, usize)) -> &Weight {
        &self.rows[i][j]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Weight {
        &mut self.rows[i][j]
    }
}
