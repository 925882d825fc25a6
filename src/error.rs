//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("无效的顶点 ID: {0}")]
    InvalidIdentifier(String),

    #[error("引用了不存在的顶点: {0}")]
    InvalidReference(String),

    #[error("不支持的输入: {0}")]
    UnsupportedInput(String),

    #[error("从顶点 {0} 可达负权环")]
    NegativeCycle(u64),

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV 错误: {0}")]
    CsvError(#[from] csv::Error),

    #[error("XML 错误: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("序列化错误: {0}")]
    SerializationError(#[from] serde_json::Error),
}
