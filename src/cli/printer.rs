//! 结果打印器
//!
//! 提供表格和 JSON 两种输出格式

use crate::algorithm::MaxFlow;
use crate::error::Result;
use crate::graph::{Graph, SquareMatrix, VertexId};
use crate::import::ImportStats;
use crate::types::Weight;
use prettytable::{format, row, Cell, Row, Table};
use serde_json::json;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// 文本 + 表格
    #[default]
    Table,
    /// JSON
    Json,
}

/// 结果打印器
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    mode: OutputMode,
}

impl Printer {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// 打印图统计信息
    pub fn print_stats(&self, graph: &Graph) -> Result<String> {
        let vertices = graph.graph_size();
        let edges = graph.edge_count();
        let density = if vertices > 1 {
            edges as f64 / (vertices * (vertices - 1)) as f64
        } else {
            0.0
        };

        if self.mode == OutputMode::Json {
            return to_json(json!({
                "vertices": vertices,
                "edges": edges,
                "density": density,
            }));
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Vertex Count", vertices.to_string()]);
        table.add_row(row!["Edge Count", edges.to_string()]);
        table.add_row(row!["Density", format!("{:.4}", density)]);
        Ok(table.to_string())
    }

    /// 打印导入统计
    pub fn print_import_stats(&self, stats: &ImportStats) -> Result<String> {
        if self.mode == OutputMode::Json {
            return to_json(serde_json::to_value(stats)?);
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Import", "Value"]);
        table.add_row(row!["Records", stats.records.to_string()]);
        table.add_row(row!["Edges Imported", stats.edges_imported.to_string()]);
        table.add_row(row!["Skipped", stats.skipped.to_string()]);
        table.add_row(row!["Duration (ms)", stats.duration_ms.to_string()]);
        Ok(table.to_string())
    }

    /// 打印路径；空路径表示不可达
    pub fn print_path(
        &self,
        algorithm: &str,
        start: VertexId,
        end: VertexId,
        path: &[VertexId],
        weight: Option<Weight>,
    ) -> Result<String> {
        if self.mode == OutputMode::Json {
            return to_json(json!({
                "algorithm": algorithm,
                "start": start,
                "end": end,
                "path": path,
                "weight": weight,
            }));
        }

        if path.is_empty() {
            return Ok(format!("{}: {} -> {} 不可达\n", algorithm, start, end));
        }

        let hops: Vec<String> = path.iter().map(|v| v.to_string()).collect();
        let mut output = format!("{}: {}\n", algorithm, hops.join(" -> "));
        output.push_str(&format!("  边数: {}\n", path.len() - 1));
        if let Some(w) = weight {
            output.push_str(&format!("  总权重: {}\n", format_weight(w)));
        }
        Ok(output)
    }

    /// 打印方阵（距离矩阵或流量矩阵），行列标题为顶点 ID
    pub fn print_matrix(&self, matrix: &SquareMatrix) -> Result<String> {
        if self.mode == OutputMode::Json {
            let rows: Vec<Vec<serde_json::Value>> = matrix
                .rows()
                .map(|row| row.iter().map(|&w| weight_to_json(w)).collect())
                .collect();
            return to_json(json!(rows));
        }

        Ok(self.matrix_table(matrix).to_string())
    }

    /// 打印最大流结果：总流量、正向流量和最小割
    pub fn print_max_flow(
        &self,
        source: VertexId,
        sink: VertexId,
        result: &MaxFlow,
        graph: &Graph,
    ) -> Result<String> {
        let cut = result.cut_edges(graph);

        if self.mode == OutputMode::Json {
            return to_json(json!({
                "source": source,
                "sink": sink,
                "value": result.value,
                "augmentations": result.augmentations,
                "source_side": result.source_side,
                "cut": cut,
                "flow": result.flow,
            }));
        }

        let mut output = format!(
            "最大流 {} -> {}: {} ({} 次增广)\n",
            source,
            sink,
            format_weight(result.value),
            result.augmentations
        );

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["From", "To", "Flow", "Capacity"]);
        for edge in graph.edges() {
            let flow = result.flow_between(edge.src(), edge.dst());
            if flow > 0.0 {
                table.add_row(row![
                    edge.src().to_string(),
                    edge.dst().to_string(),
                    format_weight(flow),
                    format_weight(edge.weight())
                ]);
            }
        }
        if table.len() > 0 {
            output.push_str(&table.to_string());
        }

        let side: Vec<String> = result.source_side.iter().map(|v| v.to_string()).collect();
        output.push_str(&format!("最小割源侧: {{{}}}\n", side.join(", ")));
        let cut: Vec<String> = cut.iter().map(|e| e.to_string()).collect();
        output.push_str(&format!("割边: {}\n", cut.join(", ")));
        Ok(output)
    }

    fn matrix_table(&self, matrix: &SquareMatrix) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let mut header = vec![Cell::new("")];
        header.extend((0..matrix.dimension()).map(|j| Cell::new(&VertexId::from_index(j).to_string())));
        table.set_titles(Row::new(header));

        for (i, row_data) in matrix.rows().enumerate() {
            let mut cells = vec![Cell::new(&VertexId::from_index(i).to_string())];
            cells.extend(row_data.iter().map(|&w| Cell::new(&format_weight(w))));
            table.add_row(Row::new(cells));
        }

        table
    }
}

/// 格式化权重：整数去掉小数部分，无穷显示为 ∞
pub fn format_weight(w: Weight) -> String {
    if w.is_infinite() {
        (if w > 0.0 { "∞" } else { "-∞" }).to_string()
    } else if w.fract() == 0.0 && w.abs() < 1e15 {
        format!("{}", w as i64)
    } else {
        format!("{}", w)
    }
}

/// JSON 无法表示无穷，输出为 null
fn weight_to_json(w: Weight) -> serde_json::Value {
    if w.is_finite() {
        json!(w)
    } else {
        serde_json::Value::Null
    }
}

fn to_json(value: serde_json::Value) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::FordFulkerson;

    fn create_test_graph() -> Graph {
        Graph::new(1..=3u64, vec![(1, 2, 2.0), (2, 3, 1.5)]).unwrap()
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(3.0), "3");
        assert_eq!(format_weight(-2.0), "-2");
        assert_eq!(format_weight(1.5), "1.5");
        assert_eq!(format_weight(f64::INFINITY), "∞");
    }

    #[test]
    fn test_print_path() {
        let printer = Printer::default();
        let path = [VertexId(1), VertexId(2), VertexId(3)];

        let out = printer
            .print_path("bfs", VertexId(1), VertexId(3), &path, Some(3.5))
            .unwrap();
        assert!(out.starts_with("bfs: 1 -> 2 -> 3"));
        assert!(out.contains("3.5"));

        let out = printer
            .print_path("dfs", VertexId(3), VertexId(1), &[], None)
            .unwrap();
        assert!(out.contains("不可达"));
    }

    #[test]
    fn test_print_matrix_json() {
        let printer = Printer::new(OutputMode::Json);
        let matrix = SquareMatrix::from_rows(vec![vec![0.0, f64::INFINITY], vec![2.0, 0.0]]).unwrap();

        let out = printer.print_matrix(&matrix).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, json!([[0.0, null], [2.0, 0.0]]));
    }

    #[test]
    fn test_print_matrix_table() {
        let printer = Printer::default();
        let matrix = SquareMatrix::from_rows(vec![vec![0.0, f64::INFINITY], vec![2.0, 0.0]]).unwrap();

        let out = printer.print_matrix(&matrix).unwrap();
        assert!(out.contains("∞"));
        assert!(out.contains('2'));
    }

    #[test]
    fn test_print_stats() {
        let graph = create_test_graph();

        let out = Printer::default().print_stats(&graph).unwrap();
        assert!(out.contains("Vertex Count"));

        let out = Printer::new(OutputMode::Json).print_stats(&graph).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["vertices"], 3);
        assert_eq!(value["edges"], 2);
    }

    #[test]
    fn test_print_max_flow() {
        let graph = create_test_graph();
        let result = FordFulkerson::new(&graph)
            .max_flow(VertexId(1), VertexId(3))
            .unwrap();

        let out = Printer::default()
            .print_max_flow(VertexId(1), VertexId(3), &result, &graph)
            .unwrap();
        assert!(out.contains("最大流 1 -> 3: 1.5"));
        assert!(out.contains("2 -> 3 (1.5)"));
    }
}
