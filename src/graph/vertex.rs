//! 顶点定义

use crate::error::{Error, Result};
use crate::types::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（正整数，图内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u64);

impl VertexId {
    /// 创建顶点 ID，0 不是合法 ID
    pub fn new(id: u64) -> Result<Self> {
        if id == 0 {
            return Err(Error::InvalidIdentifier(
                "顶点 ID 必须是正整数, 实际为 0".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// 邻接矩阵中的行/列下标（ID - 1）
    ///
    /// 调用方需保证 ID 非 0；来自外部的 ID 用 [`VertexId::checked_index`]。
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// ID 为 0 时返回 None
    pub fn checked_index(&self) -> Option<usize> {
        self.0.checked_sub(1).and_then(|i| usize::try_from(i).ok())
    }

    /// 由矩阵下标还原 ID
    pub fn from_index(index: usize) -> Self {
        Self(index as u64 + 1)
    }
}

impl TryFrom<i64> for VertexId {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self> {
        if id <= 0 {
            return Err(Error::InvalidIdentifier(format!(
                "顶点 ID 必须是正整数, 实际为 {}",
                id
            )));
        }
        Self::new(id as u64)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// 顶点 ID
    id: VertexId,
    /// 附加数据
    value: Option<PropertyValue>,
}

impl Vertex {
    /// 创建新顶点
    pub fn new(id: VertexId, value: Option<PropertyValue>) -> Self {
        Self { id, value }
    }

    /// 创建不带数据的顶点
    pub fn bare(id: VertexId) -> Self {
        Self { id, value: None }
    }

    /// 获取顶点 ID
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 获取附加数据
    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    /// 设置附加数据，返回旧值
    pub fn set_value(&mut self, value: Option<PropertyValue>) -> Option<PropertyValue> {
        std::mem::replace(&mut self.value, value)
    }
}
