//! 命令行参数

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};
use level::TileKind;
use thiserror::Error;

/// 坦克大战关卡编辑器（命令行）
#[derive(Debug, Parser)]
#[command(name = "level-editor", version, about)]
pub struct Cli {
    /// 设置文件路径（默认位于系统配置目录）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 提高日志详细程度，可重复
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 校验关卡文件并报告是否可导出
    Validate {
        file: PathBuf,
    },
    /// 显示关卡网格
    Show {
        file: PathBuf,
        /// 以 JSON 输出网格快照
        #[arg(long)]
        json: bool,
    },
    /// 编辑关卡并导出
    Edit {
        /// 作为起点的关卡文件，省略时从空白网格开始
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// 导出路径
        #[arg(short, long)]
        output: PathBuf,
        /// 关卡名称
        #[arg(long)]
        name: Option<String>,
        /// 缺少玩家或基地时仍然导出
        #[arg(long)]
        allow_incomplete: bool,
        /// 依次执行的操作：`ROW,COL=KIND` 或 `clear`
        #[arg(allow_hyphen_values = true)]
        ops: Vec<EditOp>,
    },
    /// 列出所有图块
    Palette,
    /// 显示当前设置
    Config {
        /// 将当前设置写入设置文件
        #[arg(long)]
        write: bool,
    },
}

/// 编辑操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// 放置图块
    Place { row: i64, col: i64, kind: TileKind },
    /// 清空网格
    Clear,
}

/// 编辑操作解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditOpError {
    #[error("expected `ROW,COL=KIND` or `clear`, got {0:?}")]
    Syntax(String),

    #[error("invalid coordinate {0:?}")]
    Coordinate(String),

    #[error("{0}")]
    Kind(String),
}

impl FromStr for EditOp {
    type Err = EditOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("clear") {
            return Ok(EditOp::Clear);
        }

        let (cell, kind) = s
            .split_once('=')
            .ok_or_else(|| EditOpError::Syntax(s.to_string()))?;
        let (row, col) = cell
            .split_once(',')
            .ok_or_else(|| EditOpError::Syntax(s.to_string()))?;

        let coordinate = |value: &str| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| EditOpError::Coordinate(value.trim().to_string()))
        };

        Ok(EditOp::Place {
            row: coordinate(row)?,
            col: coordinate(col)?,
            kind: kind.trim().parse().map_err(EditOpError::Kind)?,
        })
    }
}
