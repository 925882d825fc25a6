//! GraphML 读取
//!
//! 读取 `<key>` 声明、`<node>` 及其 `<data>` 子元素和 `<edge>`。
//! 节点 ID 必须是整数；节点数据按键名汇总为 `PropertyValue::Map`，
//! 键名为 `weight` 的边数据作为边权。

use super::{parse_bool, EdgeRecord};
use crate::error::{Error, Result};
use crate::types::{PropertyValue, Weight};
use roxmltree::{Document, Node};
use std::collections::{BTreeMap, HashMap};

/// 边数据中作为边权的键名
const WEIGHT_KEY: &str = "weight";

/// `<key attr.type="...">`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyType {
    Boolean,
    Integer,
    Float,
    String,
}

impl KeyType {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("boolean") => KeyType::Boolean,
            Some("int") | Some("long") => KeyType::Integer,
            Some("float") | Some("double") => KeyType::Float,
            _ => KeyType::String,
        }
    }

    fn convert(self, raw: &str) -> Result<PropertyValue> {
        match self {
            KeyType::Boolean => parse_bool(raw).map(PropertyValue::Boolean),
            KeyType::Integer => raw
                .parse()
                .map(PropertyValue::Integer)
                .map_err(|_| Error::ImportError(format!("不是整数: {}", raw))),
            KeyType::Float => raw
                .parse()
                .map(PropertyValue::Float)
                .map_err(|_| Error::ImportError(format!("不是数值: {}", raw))),
            KeyType::String => Ok(PropertyValue::String(raw.to_string())),
        }
    }
}

/// 一条 `<key>` 声明
#[derive(Debug, Clone)]
struct KeySpec {
    /// `attr.name`，缺省时为 key 的 id
    name: String,
    /// `for`：node / edge / graph / all
    domain: String,
    kind: KeyType,
    default: Option<String>,
}

impl KeySpec {
    fn applies_to(&self, domain: &str) -> bool {
        self.domain == domain || self.domain == "all"
    }
}

/// 解析出的 GraphML 内容
#[derive(Debug)]
pub(super) struct GraphMlContent {
    /// (原始节点 ID, 节点数据)，按文档顺序
    pub nodes: Vec<(i64, PropertyValue)>,
    /// 每个 `<edge>` 的解析结果，按文档顺序
    pub edges: Vec<Result<EdgeRecord>>,
}

/// 解析 GraphML 文本
///
/// XML 格式错误和节点错误直接返回；单条边的错误保留在 `edges` 中，
/// 由调用方决定报错还是跳过。
pub(super) fn parse(text: &str) -> Result<GraphMlContent> {
    let document = Document::parse(text)?;
    let root = document.root_element();

    let keys = read_keys(root);
    let edge_default = root
        .descendants()
        .find(|n| n.has_tag_name("graph"))
        .and_then(|g| g.attribute("edgedefault"))
        .map(|raw| raw.eq_ignore_ascii_case("directed"));

    let nodes = root
        .descendants()
        .filter(|n| n.has_tag_name("node"))
        .map(|node| read_node(node, &keys))
        .collect::<Result<Vec<_>>>()?;

    let edges = root
        .descendants()
        .filter(|n| n.has_tag_name("edge"))
        .map(|edge| read_edge(edge, &keys, edge_default))
        .collect();

    Ok(GraphMlContent { nodes, edges })
}

fn read_keys(root: Node<'_, '_>) -> HashMap<String, KeySpec> {
    root.descendants()
        .filter(|n| n.has_tag_name("key"))
        .filter_map(|key| {
            let id = key.attribute("id")?;
            let default = key
                .children()
                .find(|c| c.has_tag_name("default"))
                .and_then(|d| d.text())
                .map(|t| t.trim().to_string());
            let spec = KeySpec {
                name: key.attribute("attr.name").unwrap_or(id).to_string(),
                domain: key.attribute("for").unwrap_or("all").to_ascii_lowercase(),
                kind: KeyType::parse(key.attribute("attr.type")),
                default,
            };
            Some((id.to_string(), spec))
        })
        .collect()
}

/// 某元素下的 `<data>`：(键名, 键类型, 文本)
fn data_entries(
    element: Node<'_, '_>,
    keys: &HashMap<String, KeySpec>,
) -> Vec<(String, KeyType, String)> {
    element
        .children()
        .filter(|c| c.has_tag_name("data"))
        .filter_map(|data| {
            let key = data.attribute("key")?;
            let (name, kind) = match keys.get(key) {
                Some(spec) => (spec.name.clone(), spec.kind),
                None => (key.to_string(), KeyType::String),
            };
            let text = data.text().unwrap_or("").trim().to_string();
            Some((name, kind, text))
        })
        .collect()
}

fn read_node(
    node: Node<'_, '_>,
    keys: &HashMap<String, KeySpec>,
) -> Result<(i64, PropertyValue)> {
    let raw_id = node
        .attribute("id")
        .ok_or_else(|| Error::ImportError("节点缺少 id 属性".to_string()))?;
    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| Error::ImportError(format!("节点 ID 不是整数: {}", raw_id)))?;

    let mut data = BTreeMap::new();
    for spec in keys.values().filter(|s| s.applies_to("node")) {
        if let Some(default) = &spec.default {
            data.insert(spec.name.clone(), spec.kind.convert(default)?);
        }
    }
    for (name, kind, text) in data_entries(node, keys) {
        let value = kind
            .convert(&text)
            .map_err(|e| Error::ImportError(format!("节点 {} 的数据 {}: {}", id, name, e)))?;
        data.insert(name, value);
    }

    Ok((id, PropertyValue::Map(data)))
}

fn read_edge(
    edge: Node<'_, '_>,
    keys: &HashMap<String, KeySpec>,
    edge_default: Option<bool>,
) -> Result<EdgeRecord> {
    let endpoint = |name: &str| -> Result<i64> {
        let raw = edge
            .attribute(name)
            .ok_or_else(|| Error::ImportError(format!("边缺少 {} 属性", name)))?;
        raw.trim()
            .parse()
            .map_err(|_| Error::ImportError(format!("{} 不是整数: {}", name, raw)))
    };
    let source = endpoint("source")?;
    let target = endpoint("target")?;

    let mut weight = keys
        .values()
        .filter(|s| s.applies_to("edge") && s.name == WEIGHT_KEY)
        .find_map(|s| s.default.as_deref())
        .map(parse_weight)
        .transpose()?;
    if let Some((_, _, text)) = data_entries(edge, keys)
        .into_iter()
        .find(|(name, _, _)| name == WEIGHT_KEY)
    {
        weight = Some(parse_weight(&text)?);
    }

    let directed = edge
        .attribute("directed")
        .map(parse_bool)
        .transpose()?
        .or(edge_default);

    Ok(EdgeRecord {
        source,
        target,
        weight,
        directed,
    })
}

fn parse_weight(raw: &str) -> Result<Weight> {
    raw.parse()
        .map_err(|_| Error::ImportError(format!("weight 不是数值: {}", raw)))
}
