//! 坦克大战关卡核心库
//!
//! 包含:
//! - 图块种类、单例实体与文档子类型的双向映射
//! - 网格状态模型（放置、清空、快照、就绪判断）
//! - 单元格坐标与像素坐标的换算
//! - 关卡文档的 XML 读写与模式校验
//! - 快照与文档之间的编解码、关卡文件读写

mod codec;
mod constants;
mod coords;
mod document;
mod error;
mod file;
mod grid;
mod schema;
mod tile;
mod xml;

pub use codec::LevelCodec;
pub use constants::*;
pub use coords::{Cell, PixelPoint};
pub use document::{
    EnemyEntry, LevelDocument, LevelLayout, LevelMetadata, PlayerEntry, StaticEntry,
};
pub use error::{LevelError, Result};
pub use file::{read_level, write_level};
pub use grid::{GridModel, GridSnapshot, Placement, Readiness};
pub use schema::{validate, AttrRule, AttrType, ChildRule, ElementRule, LEVEL_CONFIG};
pub use tile::{Collection, DocumentSubtype, Singleton, TileKind};
pub use xml::XmlElement;
