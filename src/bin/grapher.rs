//! grapher 命令行工具
//!
//! 从边列表或 GraphML 文件构建图，然后运行遍历、最短路径或最大流算法

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grapher::algorithm::AugmentingPath;
use grapher::cli::{execute, OutputMode, Printer, Query};
use grapher::graph::VertexId;
use grapher::import::{EdgeListImporter, ImportFormat, ImportOptions};
use grapher::DEFAULT_MAX_VERTICES;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "grapher")]
#[command(about = "有向带权图算法工具", version)]
struct Args {
    /// 输入文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输入格式: csv, jsonl, graphml（默认按扩展名判断，无法判断时为 csv）
    #[arg(short, long)]
    format: Option<String>,

    /// 允许的最大顶点 ID
    #[arg(long, default_value_t = DEFAULT_MAX_VERTICES)]
    max_vertices: u64,

    /// CSV 分隔符
    #[arg(long)]
    delimiter: Option<char>,

    /// 未标明方向的记录按无向边处理
    #[arg(long)]
    undirected: bool,

    /// 跳过格式错误的记录
    #[arg(long)]
    skip_invalid: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 图统计信息
    Info,
    /// 广度优先搜索路径（边数最少）
    Bfs { start: u64, end: u64 },
    /// 深度优先搜索路径
    Dfs { start: u64, end: u64 },
    /// Bellman-Ford 最短路径（允许负权）
    BellmanFord { start: u64, end: u64 },
    /// Dijkstra 最短路径
    Dijkstra { start: u64, end: u64 },
    /// 全源最短距离矩阵
    FloydWarshall,
    /// 最大流与最小割
    MaxFlow {
        source: u64,
        sink: u64,
        /// 增广路径搜索方式: dfs, bfs
        #[arg(long, default_value = "dfs")]
        strategy: String,
    },
}

impl Command {
    fn into_query(self) -> Result<Query> {
        let id = |raw: u64| VertexId::new(raw).context("顶点参数无效");

        Ok(match self {
            Command::Info => Query::Info,
            Command::Bfs { start, end } => Query::Bfs {
                start: id(start)?,
                end: id(end)?,
            },
            Command::Dfs { start, end } => Query::Dfs {
                start: id(start)?,
                end: id(end)?,
            },
            Command::BellmanFord { start, end } => Query::BellmanFord {
                start: id(start)?,
                end: id(end)?,
            },
            Command::Dijkstra { start, end } => Query::Dijkstra {
                start: id(start)?,
                end: id(end)?,
            },
            Command::FloydWarshall => Query::FloydWarshall,
            Command::MaxFlow {
                source,
                sink,
                strategy,
            } => {
                let strategy = match strategy.as_str() {
                    "dfs" => AugmentingPath::DepthFirst,
                    "bfs" => AugmentingPath::BreadthFirst,
                    other => anyhow::bail!("不支持的增广方式: {} (可选 dfs, bfs)", other),
                };
                Query::MaxFlow {
                    source: id(source)?,
                    sink: id(sink)?,
                    strategy,
                }
            }
        })
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "grapher=debug" } else { "grapher=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let format = match &args.format {
        Some(format) => format.parse::<ImportFormat>()?,
        None => ImportFormat::from_path(&args.input).unwrap_or(ImportFormat::Csv),
    };
    let mut options = ImportOptions::new()
        .directed_by_default(!args.undirected)
        .skip_invalid(args.skip_invalid)
        .with_max_vertices(args.max_vertices);
    if let Some(delimiter) = args.delimiter {
        let delimiter = u8::try_from(delimiter).context("分隔符必须是单字节字符")?;
        options = options.with_delimiter(delimiter);
    }

    let (graph, stats) = EdgeListImporter::with_options(options)
        .import(&args.input, format)
        .with_context(|| format!("无法导入 {}", args.input.display()))?;

    let printer = Printer::new(if args.json {
        OutputMode::Json
    } else {
        OutputMode::Table
    });

    let query = args.command.into_query()?;
    if query == Query::Info && printer.mode() == OutputMode::Table {
        print!("{}", printer.print_import_stats(&stats)?);
    }

    print!("{}", execute(&graph, query, &printer)?);
    Ok(())
}
