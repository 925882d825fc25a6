//! 通用类型定义
//!
//! 边权、顶点附加数据，以及图构造时使用的输入变体

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 边权（容量、距离）
pub type Weight = f64;

/// 未指定权重时的默认边权
pub const DEFAULT_WEIGHT: Weight = 1.0;

/// 由边端点推断顶点集合时允许的最大顶点数
///
/// 邻接矩阵是稠密的 N×N，单个过大的端点就会分配巨大的矩阵。
pub const DEFAULT_MAX_VERTICES: u64 = 8192;

/// 顶点附加数据（对图算法不透明）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Boolean(_) => "bool",
            PropertyValue::Integer(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::List(_) => "list",
            PropertyValue::Map(_) => "map",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Boolean(v) => write!(f, "{}", v),
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::String(v) => write!(f, "{}", v),
            PropertyValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Boolean(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

/// 构造图时的顶点输入
///
/// 同一次构造中只能使用一种形式：要么全部是裸 ID，要么全部带数据。
#[derive(Debug, Clone, PartialEq)]
pub enum VertexInput {
    /// 仅 ID
    Identifier(u64),
    /// ID 与附加数据
    IdentifierWithValue(u64, PropertyValue),
}

impl VertexInput {
    /// 原始 ID（尚未校验）
    pub fn raw_id(&self) -> u64 {
        match self {
            VertexInput::Identifier(id) | VertexInput::IdentifierWithValue(id, _) => *id,
        }
    }

    pub(crate) fn has_value(&self) -> bool {
        matches!(self, VertexInput::IdentifierWithValue(..))
    }

    pub(crate) fn into_value(self) -> Option<PropertyValue> {
        match self {
            VertexInput::Identifier(_) => None,
            VertexInput::IdentifierWithValue(_, value) => Some(value),
        }
    }
}

impl From<u64> for VertexInput {
    fn from(id: u64) -> Self {
        VertexInput::Identifier(id)
    }
}

impl<V: Into<PropertyValue>> From<(u64, V)> for VertexInput {
    fn from((id, value): (u64, V)) -> Self {
        VertexInput::IdentifierWithValue(id, value.into())
    }
}

/// 构造图时的边输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeInput {
    /// (源, 目标)，权重取默认值
    Pair(u64, u64),
    /// (源, 目标, 权重)
    WeightedTriple(u64, u64, Weight),
}

impl EdgeInput {
    pub fn source(&self) -> u64 {
        match self {
            EdgeInput::Pair(s, _) | EdgeInput::WeightedTriple(s, _, _) => *s,
        }
    }

    pub fn target(&self) -> u64 {
        match self {
            EdgeInput::Pair(_, t) | EdgeInput::WeightedTriple(_, t, _) => *t,
        }
    }

    pub fn weight(&self) -> Weight {
        match self {
            EdgeInput::Pair(..) => DEFAULT_WEIGHT,
            EdgeInput::WeightedTriple(_, _, w) => *w,
        }
    }

    /// 反向边（无向关系由调用方镜像成两条有向边）
    pub fn reversed(&self) -> Self {
        match *self {
            EdgeInput::Pair(s, t) => EdgeInput::Pair(t, s),
            EdgeInput::WeightedTriple(s, t, w) => EdgeInput::WeightedTriple(t, s, w),
        }
    }
}

impl From<(u64, u64)> for EdgeInput {
    fn from((s, t): (u64, u64)) -> Self {
        EdgeInput::Pair(s, t)
    }
}

impl From<(u64, u64, Weight)> for EdgeInput {
    fn from((s, t, w): (u64, u64, Weight)) -> Self {
        EdgeInput::WeightedTriple(s, t, w)
    }
}
