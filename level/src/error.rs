//! 错误类型定义

use thiserror::Error;

use crate::constants::SCHEMA_NAME;

/// 关卡文档与文件操作错误
#[derive(Error, Debug)]
pub enum LevelError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML 语法错误（文档不是良构的 XML）
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// 文档不符合模式
    #[error("Schema violation ({}) at {path}: {reason}", SCHEMA_NAME)]
    Schema { path: String, reason: String },

    /// 文档引用了没有对应图块的子类型
    #[error("Unknown tile type in <{element}>: {value:?}")]
    UnknownTileType { element: String, value: String },

    /// 条目坐标换算后落在网格之外
    #[error("<{element}> at pixel ({x}, {y}) lies outside the grid")]
    CellOutOfRange { element: String, x: i32, y: i32 },

    /// 两个条目落在同一单元格
    #[error("More than one entry occupies cell ({row}, {col})")]
    CellConflict { row: usize, col: usize },

    /// 单例实体出现多次
    #[error("{name} appears more than once")]
    DuplicateSingleton { name: String },

    /// 缺少必需的单例，无法导出
    #[error("Level is not ready to export, missing: {}", .missing.join(", "))]
    NotReady { missing: Vec<String> },
}

impl LevelError {
    /// 构造模式错误
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LevelError::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// 是否属于文档校验类错误（而非 IO 错误）
    pub fn is_validation(&self) -> bool {
        !matches!(self, LevelError::Io(_) | LevelError::NotReady { .. })
    }
}

/// 关卡操作结果类型
pub type Result<T> = std::result::Result<T, LevelError>;
