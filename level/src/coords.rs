//! 单元格坐标与像素坐标
//!
//! 文档中的像素坐标指向单元格中心：
//! `px = col * CELL_SIZE + CELL_SIZE / 2`，反变换使用向下取整除法。

use serde::{Deserialize, Serialize};

use crate::constants::{CELL_SIZE, HALF_CELL};

/// 网格单元格（行、列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// 创建单元格（不检查边界）
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 单元格中心的像素坐标
    pub fn to_pixel(&self) -> PixelPoint {
        PixelPoint {
            x: self.col as i32 * CELL_SIZE + HALF_CELL,
            y: self.row as i32 * CELL_SIZE + HALF_CELL,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 像素坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 中心坐标反变换，返回 (行, 列)，可能为负或越界
    pub fn to_grid(&self) -> (i64, i64) {
        let row = (i64::from(self.y) - i64::from(HALF_CELL)).div_euclid(i64::from(CELL_SIZE));
        let col = (i64::from(self.x) - i64::from(HALF_CELL)).div_euclid(i64::from(CELL_SIZE));
        (row, col)
    }

    /// 指针坐标换算（指针落在单元格内任意位置）
    pub fn pointer_to_grid(&self) -> (i64, i64) {
        let row = i64::from(self.y).div_euclid(i64::from(CELL_SIZE));
        let col = i64::from(self.x).div_euclid(i64::from(CELL_SIZE));
        (row, col)
    }
}
