//! 数据导入模块
//!
//! 从 CSV、JSON Lines 边列表或 GraphML 文件构建图。
//!
//! - CSV：`source,target[,weight[,directed]]`，表头可选
//! - JSON Lines：`{"source":1,"target":2,"weight":3.0,"directed":true}`
//! - GraphML：`<node>` 声明顶点及其数据，`<edge>` 声明边
//!
//! 无向记录会被镜像为两条有向边。边列表格式的顶点集合为 `1..=最大端点`，
//! 端点不能超过 `max_vertices`。

mod graphml;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::types::{EdgeInput, PropertyValue, Weight, DEFAULT_MAX_VERTICES};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportFormat {
    Csv,
    JsonLines,
    GraphMl,
}

impl ImportFormat {
    /// 按文件扩展名判断格式
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl FromStr for ImportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "jsonl" | "json" | "ndjson" => Ok(ImportFormat::JsonLines),
            "graphml" | "xml" => Ok(ImportFormat::GraphMl),
            other => Err(Error::ParseError(format!("不支持的格式: {}", other))),
        }
    }
}

/// 导入选项
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// CSV 分隔符
    delimiter: u8,
    /// CSV 是否有表头；None 表示根据首行自动判断
    has_headers: Option<bool>,
    /// 记录未给出 directed 时的默认值
    directed: bool,
    /// 跳过格式错误的记录而不是报错
    skip_invalid: bool,
    /// 允许的最大顶点 ID
    max_vertices: u64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: None,
            directed: true,
            skip_invalid: false,
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置 CSV 分隔符
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// 明确指定 CSV 是否有表头
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = Some(has_headers);
        self
    }

    /// 设置默认方向
    pub fn directed_by_default(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// 跳过格式错误的记录
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// 设置最大顶点 ID（邻接矩阵为 N×N）
    pub fn with_max_vertices(mut self, max_vertices: u64) -> Self {
        self.max_vertices = max_vertices;
        self
    }
}

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    /// 读取的记录数（不含表头和空行）
    pub records: usize,
    /// 生成的有向边数（无向记录计 2）
    pub edges_imported: usize,
    /// 被跳过的记录数
    pub skipped: usize,
    pub duration_ms: u64,
}

/// 边记录
#[derive(Debug, Clone, Deserialize)]
struct EdgeRecord {
    source: i64,
    target: i64,
    #[serde(default)]
    weight: Option<Weight>,
    #[serde(default)]
    directed: Option<bool>,
}

/// 边列表导入器
#[derive(Debug, Clone, Default)]
pub struct EdgeListImporter {
    options: ImportOptions,
}

impl EdgeListImporter {
    /// 创建导入器（默认选项）
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定选项创建导入器
    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    /// 按格式从文件导入
    pub fn import<P: AsRef<Path>>(
        &self,
        path: P,
        format: ImportFormat,
    ) -> Result<(Graph, ImportStats)> {
        match format {
            ImportFormat::Csv => self.import_csv(path),
            ImportFormat::JsonLines => self.import_jsonl(path),
            ImportFormat::GraphMl => self.import_graphml(path),
        }
    }

    /// 从 CSV 文件导入
    pub fn import_csv<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        debug!("导入 CSV: {}", path.as_ref().display());
        let file = File::open(path)?;
        self.import_csv_reader(file)
    }

    /// 从任意 CSV 读取器导入
    pub fn import_csv_reader<R: Read>(&self, reader: R) -> Result<(Graph, ImportStats)> {
        let start = Instant::now();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut collector = EdgeCollector::new(&self.options);
        let mut first = true;

        for row in reader.records() {
            let row = row?;
            if row.iter().all(str::is_empty) {
                continue;
            }
            if std::mem::take(&mut first) && self.is_header(&row) {
                debug!("跳过表头: {:?}", row);
                continue;
            }
            collector.accept(parse_csv_record(&row))?;
        }

        collector.finish(start)
    }

    /// 从 JSON Lines 文件导入
    pub fn import_jsonl<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        debug!("导入 JSON Lines: {}", path.as_ref().display());
        let file = File::open(path)?;
        self.import_jsonl_reader(BufReader::new(file))
    }

    /// 从任意 JSON Lines 读取器导入
    pub fn import_jsonl_reader<R: BufRead>(&self, reader: R) -> Result<(Graph, ImportStats)> {
        let start = Instant::now();
        let mut collector = EdgeCollector::new(&self.options);

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str::<EdgeRecord>(line)
                .map_err(|e| Error::ImportError(format!("JSON 解析错误: {}", e)));
            collector.accept(record)?;
        }

        collector.finish(start)
    }

    /// 从 GraphML 文件导入
    pub fn import_graphml<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        debug!("导入 GraphML: {}", path.as_ref().display());
        let text = std::fs::read_to_string(path)?;
        self.import_graphml_str(&text)
    }

    /// 从 GraphML 文本导入
    ///
    /// 顶点集合取自 `<node>`，每个顶点的数据为其 `<data>` 组成的映射；
    /// `<edge>` 按记录处理，方向取 `directed` 属性、`edgedefault` 或默认选项。
    pub fn import_graphml_str(&self, text: &str) -> Result<(Graph, ImportStats)> {
        let start = Instant::now();
        let content = graphml::parse(text)?;

        let mut collector = EdgeCollector::new(&self.options);
        let mut vertices = Vec::with_capacity(content.nodes.len());
        for (raw, data) in content.nodes {
            vertices.push((collector.check_id(raw)?, data));
        }
        for record in content.edges {
            collector.accept(record)?;
        }

        collector.finish_with_vertices(vertices, start)
    }

    fn is_header(&self, row: &csv::StringRecord) -> bool {
        match self.options.has_headers {
            Some(has_headers) => has_headers,
            None => row.get(0).map_or(false, |f| f.parse::<i64>().is_err()),
        }
    }
}

/// 逐条校验记录并累积边
struct EdgeCollector<'a> {
    options: &'a ImportOptions,
    edges: Vec<EdgeInput>,
    stats: ImportStats,
}

impl<'a> EdgeCollector<'a> {
    fn new(options: &'a ImportOptions) -> Self {
        Self {
            options,
            edges: Vec::new(),
            stats: ImportStats::default(),
        }
    }

    fn accept(&mut self, record: Result<EdgeRecord>) -> Result<()> {
        self.stats.records += 1;
        let number = self.stats.records;

        match record.and_then(|r| self.to_edges(r)) {
            Ok(edges) => {
                self.stats.edges_imported += edges.len();
                self.edges.extend(edges);
                Ok(())
            }
            Err(e) if self.options.skip_invalid => {
                warn!("跳过第 {} 条记录: {}", number, e);
                self.stats.skipped += 1;
                Ok(())
            }
            Err(Error::InvalidIdentifier(msg)) => Err(Error::InvalidIdentifier(format!(
                "第 {} 条记录: {}",
                number, msg
            ))),
            Err(Error::ImportError(msg)) => Err(Error::ImportError(format!(
                "第 {} 条记录: {}",
                number, msg
            ))),
            Err(e) => Err(e),
        }
    }

    /// 正整数且不超过上限
    fn check_id(&self, raw: i64) -> Result<u64> {
        let id = positive_id(raw)?;
        if id > self.options.max_vertices {
            return Err(Error::ImportError(format!(
                "顶点 ID {} 超过上限 {}",
                id, self.options.max_vertices
            )));
        }
        Ok(id)
    }

    fn to_edges(&self, record: EdgeRecord) -> Result<Vec<EdgeInput>> {
        let source = self.check_id(record.source)?;
        let target = self.check_id(record.target)?;

        let edge = match record.weight {
            None => EdgeInput::Pair(source, target),
            Some(w) if w.is_finite() && w != 0.0 => EdgeInput::WeightedTriple(source, target, w),
            Some(w) => {
                return Err(Error::ImportError(format!(
                    "边权必须是非零有限数, 实际为 {}",
                    w
                )))
            }
        };

        let directed = record.directed.unwrap_or(self.options.directed);
        if directed || source == target {
            Ok(vec![edge])
        } else {
            Ok(vec![edge, edge.reversed()])
        }
    }

    fn finish(self, start: Instant) -> Result<(Graph, ImportStats)> {
        let graph = Graph::from_edge_list_bounded(self.edges, self.options.max_vertices)?;
        Self::report(graph, self.stats, start)
    }

    fn finish_with_vertices(
        self,
        vertices: Vec<(u64, PropertyValue)>,
        start: Instant,
    ) -> Result<(Graph, ImportStats)> {
        let graph = Graph::new(vertices, self.edges)?;
        Self::report(graph, self.stats, start)
    }

    fn report(
        graph: Graph,
        mut stats: ImportStats,
        start: Instant,
    ) -> Result<(Graph, ImportStats)> {
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "导入完成: {} 条记录, {} 条边, 跳过 {}, 图 {} 顶点 / {} 边, 耗时 {} ms",
            stats.records,
            stats.edges_imported,
            stats.skipped,
            graph.graph_size(),
            graph.edge_count(),
            stats.duration_ms
        );

        Ok((graph, stats))
    }
}

fn positive_id(raw: i64) -> Result<u64> {
    if raw <= 0 {
        return Err(Error::InvalidIdentifier(format!(
            "顶点 ID 必须是正整数, 实际为 {}",
            raw
        )));
    }
    Ok(raw as u64)
}

fn parse_csv_record(row: &csv::StringRecord) -> Result<EdgeRecord> {
    if row.len() < 2 {
        return Err(Error::ImportError(format!(
            "至少需要 source,target 两列, 实际 {} 列",
            row.len()
        )));
    }

    let field = |i: usize| row.get(i).filter(|f| !f.is_empty());
    let parse_id = |i: usize, name: &str| -> Result<i64> {
        let raw = field(i).ok_or_else(|| Error::ImportError(format!("缺少 {}", name)))?;
        raw.parse()
            .map_err(|_| Error::ImportError(format!("{} 不是整数: {}", name, raw)))
    };

    let source = parse_id(0, "source")?;
    let target = parse_id(1, "target")?;
    let weight = field(2)
        .map(|raw| {
            raw.parse::<Weight>()
                .map_err(|_| Error::ImportError(format!("weight 不是数值: {}", raw)))
        })
        .transpose()?;
    let directed = field(3).map(parse_bool).transpose()?;

    Ok(EdgeRecord {
        source,
        target,
        weight,
        directed,
    })
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(Error::ImportError(format!("不是布尔值: {}", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_import_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "source,target,weight").unwrap();
        writeln!(file, "1,2,3.5").unwrap();
        writeln!(file, "2,3").unwrap();
        writeln!(file, "3,4,2,false").unwrap();

        let (graph, stats) = EdgeListImporter::new().import_csv(file.path()).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.edges_imported, 4);
        assert_eq!(stats.skipped, 0);
        assert_eq!(graph.graph_size(), 4);
        assert_eq!(graph.edge_weight(VertexId(1), VertexId(2)), Some(3.5));
        assert_eq!(graph.edge_weight(VertexId(2), VertexId(3)), Some(1.0));
        assert_eq!(graph.edge_weight(VertexId(4), VertexId(3)), Some(2.0));
    }

    #[test]
    fn test_import_csv_without_header() {
        let data = "1;2;4\n2;1;4\n";
        let importer = EdgeListImporter::with_options(ImportOptions::new().with_delimiter(b';'));
        let (graph, stats) = importer.import_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_import_undirected_by_default() {
        let data = "1,2\n2,3,5\n3,3\n";
        let importer =
            EdgeListImporter::with_options(ImportOptions::new().directed_by_default(false));
        let (graph, stats) = importer.import_csv_reader(data.as_bytes()).unwrap();

        // 自环不镜像
        assert_eq!(stats.edges_imported, 5);
        assert!(graph.has_edge(VertexId(2), VertexId(1)));
        assert_eq!(graph.edge_weight(VertexId(3), VertexId(2)), Some(5.0));
        assert_eq!(graph.out_degree(VertexId(3)), 2);
    }

    #[test]
    fn test_import_csv_strict_error() {
        let data = "1,2\n2,x\n";
        let err = EdgeListImporter::new()
            .import_csv_reader(data.as_bytes())
            .unwrap_err();

        match err {
            Error::ImportError(msg) => assert!(msg.contains("第 2 条记录")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_import_invalid_identifier() {
        let data = "1,0\n";
        let err = EdgeListImporter::new()
            .import_csv_reader(data.as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn test_import_skip_invalid() {
        let data = "1,2\n-1,2\n2,3,0\n3\n3,1,abc\n3,1\n";
        let importer = EdgeListImporter::with_options(ImportOptions::new().skip_invalid(true));
        let (graph, stats) = importer.import_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(stats.records, 6);
        assert_eq!(stats.skipped, 4);
        assert_eq!(stats.edges_imported, 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_import_jsonl() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"source":1,"target":2,"weight":10.0}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"source":2,"target":3,"directed":false}}"#).unwrap();

        let (graph, stats) = EdgeListImporter::new()
            .import(file.path(), ImportFormat::JsonLines)
            .unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.edges_imported, 3);
        assert_eq!(graph.graph_size(), 3);
        assert_eq!(graph.edge_weight(VertexId(1), VertexId(2)), Some(10.0));
        assert!(graph.has_edge(VertexId(3), VertexId(2)));
    }

    #[test]
    fn test_import_jsonl_malformed() {
        let data = "{\"source\":1,\"target\":2}\n{\"source\":1}\n";
        let err = EdgeListImporter::new()
            .import_jsonl_reader(data.as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::ImportError(_)));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ImportFormat>().unwrap(), ImportFormat::Csv);
        assert_eq!(
            "jsonl".parse::<ImportFormat>().unwrap(),
            ImportFormat::JsonLines
        );
        assert_eq!(
            "GraphML".parse::<ImportFormat>().unwrap(),
            ImportFormat::GraphMl
        );
        assert!("parquet".parse::<ImportFormat>().is_err());

        assert_eq!(
            ImportFormat::from_path("data/airlines.graphml"),
            Some(ImportFormat::GraphMl)
        );
        assert_eq!(
            ImportFormat::from_path("edges.csv"),
            Some(ImportFormat::Csv)
        );
        assert_eq!(ImportFormat::from_path("edges"), None);
    }

    #[test]
    fn test_import_rejects_huge_identifier() {
        let data = "1,9223372036854775807\n";
        let err = EdgeListImporter::new()
            .import_csv_reader(data.as_bytes())
            .unwrap_err();
        match err {
            Error::ImportError(msg) => {
                assert!(msg.contains("第 1 条记录"));
                assert!(msg.contains("上限"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let options = ImportOptions::new().with_max_vertices(3).skip_invalid(true);
        let data = "1,2\n2,4\n3,1\n";
        let (graph, stats) = EdgeListImporter::with_options(options)
            .import_csv_reader(data.as_bytes())
            .unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(graph.graph_size(), 3);
    }

    #[test]
    fn test_import_graphml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="name" for="node" attr.name="name" attr.type="string"/>
  <key id="pop" for="node" attr.name="population" attr.type="int"/>
  <key id="w" for="edge" attr.name="weight" attr.type="double"/>
  <graph id="routes" edgedefault="undirected">
    <node id="1"><data key="name">Beijing</data><data key="pop">21</data></node>
    <node id="2"><data key="name">Shanghai</data></node>
    <node id="3"/>
    <edge source="1" target="2"><data key="w">2.5</data></edge>
    <edge source="2" target="3" directed="true"/>
  </graph>
</graphml>"#
        )
        .unwrap();

        let (graph, stats) = EdgeListImporter::new()
            .import(file.path(), ImportFormat::GraphMl)
            .unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.edges_imported, 3);
        assert_eq!(graph.graph_size(), 3);
        assert_eq!(graph.edge_weight(VertexId(1), VertexId(2)), Some(2.5));
        assert_eq!(graph.edge_weight(VertexId(2), VertexId(1)), Some(2.5));
        assert!(graph.has_edge(VertexId(2), VertexId(3)));
        assert!(!graph.has_edge(VertexId(3), VertexId(2)));

        let data = match graph.get_vertex_data(VertexId(1)) {
            Some(PropertyValue::Map(map)) => map.clone(),
            other => panic!("unexpected data: {:?}", other),
        };
        assert_eq!(data.get("name"), Some(&PropertyValue::from("Beijing")));
        assert_eq!(data.get("population"), Some(&PropertyValue::Integer(21)));
        assert_eq!(
            graph.get_vertex_data(VertexId(3)),
            Some(&PropertyValue::Map(Default::default()))
        );
    }

    #[test]
    fn test_import_graphml_errors() {
        let importer = EdgeListImporter::new();

        // 顶点 ID 不连续
        let sparse = r#"<graphml><graph><node id="1"/><node id="3"/></graph></graphml>"#;
        assert!(matches!(
            importer.import_graphml_str(sparse),
            Err(Error::InvalidIdentifier(_))
        ));

        // 边引用未声明的顶点
        let dangling = r#"<graphml><graph edgedefault="directed">
            <node id="1"/><node id="2"/><edge source="1" target="5"/>
        </graph></graphml>"#;
        assert!(matches!(
            importer.import_graphml_str(dangling),
            Err(Error::InvalidReference(_))
        ));

        let huge = r#"<graphml><graph><node id="100000"/></graph></graphml>"#;
        assert!(matches!(
            importer.import_graphml_str(huge),
            Err(Error::ImportError(_))
        ));

        let bad_weight = r#"<graphml><graph edgedefault="directed">
            <node id="1"/><node id="2"/>
            <edge source="1" target="2"><data key="weight">heavy</data></edge>
            <edge source="2" target="1"/>
        </graph></graphml>"#;
        let err = importer.import_graphml_str(bad_weight).unwrap_err();
        assert!(matches!(err, Error::ImportError(ref msg) if msg.contains("第 1 条记录")));

        let lenient = EdgeListImporter::with_options(ImportOptions::new().skip_invalid(true));
        let (graph, stats) = lenient.import_graphml_str(bad_weight).unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(graph.edge_count(), 1);
    }
}
