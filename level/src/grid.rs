//! 网格状态模型
//!
//! [`GridModel`] 持有图块网格、三个单例实体的位置以及当前选中的图块。
//! 它不知道文档格式，也不关心如何渲染。

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_COLS, GRID_ROWS};
use crate::coords::{Cell, PixelPoint};
use crate::tile::{Singleton, TileKind};

/// 一次成功放置带来的变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// 被写入的单元格
    pub cell: Cell,
    /// 写入的图块
    pub kind: TileKind,
    /// 单例移动时被清空的旧单元格
    pub vacated: Option<Cell>,
}

impl Placement {
    /// 需要重绘的单元格
    pub fn dirty_cells(&self) -> impl Iterator<Item = Cell> {
        std::iter::once(self.cell).chain(self.vacated)
    }
}

/// 单例放置情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub player1: bool,
    pub player2: bool,
    pub base: bool,
}

impl Readiness {
    /// 三个单例都已放置才允许导出
    pub fn is_ready(&self) -> bool {
        self.player1 && self.player2 && self.base
    }

    /// 缺少的单例（固定顺序）
    pub fn missing(&self) -> Vec<Singleton> {
        Singleton::ALL
            .into_iter()
            .filter(|singleton| !self.has(*singleton))
            .collect()
    }

    fn has(&self, singleton: Singleton) -> bool {
        match singleton {
            Singleton::Player1 => self.player1,
            Singleton::Player2 => self.player2,
            Singleton::Base => self.base,
        }
    }
}

/// 网格快照（只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// 按行优先存储，索引为 row * cols + col
    pub cells: Vec<TileKind>,
    pub player1: Option<Cell>,
    pub player2: Option<Cell>,
    pub base: Option<Cell>,
}

impl GridSnapshot {
    /// 获取单元格图块，越界返回 `None`
    pub fn get(&self, row: usize, col: usize) -> Option<TileKind> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// 单例位置
    pub fn singleton(&self, singleton: Singleton) -> Option<Cell> {
        match singleton {
            Singleton::Player1 => self.player1,
            Singleton::Player2 => self.player2,
            Singleton::Base => self.base,
        }
    }

    /// 是否可以导出
    pub fn readiness(&self) -> Readiness {
        Readiness {
            player1: self.player1.is_some(),
            player2: self.player2.is_some(),
            base: self.base.is_some(),
        }
    }

    /// 行优先遍历所有单元格
    pub fn iter(&self) -> impl Iterator<Item = (Cell, TileKind)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, kind)| (Cell::new(index / cols, index % cols), *kind))
    }
}

/// 网格模型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    cells: Vec<TileKind>,
    /// 玩家 1、玩家 2、基地的位置
    singletons: [Option<Cell>; 3],
    /// 当前选中的图块（编辑光标）
    selected: TileKind,
}

impl GridModel {
    /// 创建指定尺寸的空网格
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![TileKind::Empty; rows * cols],
            singletons: [None; 3],
            selected: TileKind::Brick,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 将任意整数坐标转换为网格内的单元格
    pub fn cell_at(&self, row: i64, col: i64) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.rows && col < self.cols).then(|| Cell::new(row, col))
    }

    /// 获取单元格图块，越界返回 `None`
    pub fn get(&self, cell: Cell) -> Option<TileKind> {
        if cell.row < self.rows && cell.col < self.cols {
            Some(self.cells[self.index(cell)])
        } else {
            None
        }
    }

    /// 单例位置
    pub fn singleton(&self, singleton: Singleton) -> Option<Cell> {
        self.singletons[singleton.index()]
    }

    /// 放置图块
    ///
    /// 越界坐标静默忽略；与现有图块相同时不做任何事。放置单例时会先清空
    /// 它原来所在的单元格，覆盖另一个单例时会取消对它的跟踪。
    /// 返回 `None` 表示网格没有变化。
    pub fn place(&mut self, row: i64, col: i64, kind: TileKind) -> Option<Placement> {
        let cell = self.cell_at(row, col)?;
        let index = self.index(cell);
        let previous = self.cells[index];
        if previous == kind {
            return None;
        }

        let mut vacated = None;
        if let Some(singleton) = kind.singleton() {
            if let Some(old) = self.singletons[singleton.index()].take() {
                let old_index = self.index(old);
                self.cells[old_index] = TileKind::Empty;
                vacated = Some(old);
            }
            self.singletons[singleton.index()] = Some(cell);
        }

        if let Some(overwritten) = previous.singleton() {
            self.singletons[overwritten.index()] = None;
        }

        self.cells[index] = kind;
        tracing::trace!("放置 {} 于 {}", kind, cell);

        Some(Placement {
            cell,
            kind,
            vacated,
        })
    }

    /// 用当前选中的图块放置
    pub fn paint(&mut self, row: i64, col: i64) -> Option<Placement> {
        self.place(row, col, self.selected)
    }

    /// 按指针像素位置放置当前选中的图块
    pub fn paint_at_pointer(&mut self, pointer: PixelPoint) -> Option<Placement> {
        let (row, col) = pointer.pointer_to_grid();
        self.paint(row, col)
    }

    /// 选择图块
    pub fn select(&mut self, kind: TileKind) {
        self.selected = kind;
    }

    /// 当前选中的图块
    pub fn selected(&self) -> TileKind {
        self.selected
    }

    /// 清空网格
    pub fn clear(&mut self) {
        self.cells.fill(TileKind::Empty);
        self.singletons = [None; 3];
    }

    /// 获取快照
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
            player1: self.singleton(Singleton::Player1),
            player2: self.singleton(Singleton::Player2),
            base: self.singleton(Singleton::Base),
        }
    }

    /// 是否可以导出
    pub fn readiness(&self) -> Readiness {
        Readiness {
            player1: self.singleton(Singleton::Player1).is_some(),
            player2: self.singleton(Singleton::Player2).is_some(),
            base: self.singleton(Singleton::Base).is_some(),
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new(GRID_ROWS, GRID_COLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 单例不变式：跟踪位置存在当且仅当该单元格持有此单例，且全网格至多一处
    fn assert_singleton_invariant(model: &GridModel) {
        let snapshot = model.snapshot();
        for singleton in Singleton::ALL {
            let cells: Vec<Cell> = snapshot
                .iter()
                .filter(|(_, kind)| *kind == singleton.tile())
                .map(|(cell, _)| cell)
                .collect();
            match model.singleton(singleton) {
                Some(tracked) => assert_eq!(cells, vec![tracked]),
                None => assert!(cells.is_empty()),
            }
        }
    }

    #[test]
    fn test_place_brick() {
        let mut model = GridModel::default();
        let placement = model.place(0, 0, TileKind::Brick).unwrap();

        assert_eq!(placement.cell, Cell::new(0, 0));
        assert_eq!(placement.vacated, None);
        assert_eq!(model.snapshot().get(0, 0), Some(TileKind::Brick));
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut model = GridModel::default();
        model.place(3, 4, TileKind::Water);
        let once = model.clone();

        assert!(model.place(3, 4, TileKind::Water).is_none());
        assert_eq!(model, once);
    }

    #[test]
    fn test_same_singleton_twice() {
        let mut model = GridModel::default();
        model.place(2, 2, TileKind::Player1);
        assert!(model.place(2, 2, TileKind::Player1).is_none());

        assert_eq!(model.singleton(Singleton::Player1), Some(Cell::new(2, 2)));
        assert_singleton_invariant(&model);
    }

    #[test]
    fn test_singleton_moves() {
        let mut model = GridModel::default();
        model.place(1, 1, TileKind::Player1);
        let placement = model.place(5, 5, TileKind::Player1).unwrap();

        assert_eq!(placement.vacated, Some(Cell::new(1, 1)));
        assert_eq!(model.get(Cell::new(1, 1)), Some(TileKind::Empty));
        assert_eq!(model.singleton(Singleton::Player1), Some(Cell::new(5, 5)));
        assert_eq!(placement.dirty_cells().count(), 2);
        assert_singleton_invariant(&model);
    }

    #[test]
    fn test_overwriting_singleton_untracks_it() {
        let mut model = GridModel::default();
        model.place(4, 4, TileKind::Base);
        model.place(4, 4, TileKind::Brick);

        assert_eq!(model.singleton(Singleton::Base), None);
        assert!(!model.readiness().base);
        assert_singleton_invariant(&model);

        // 一个单例覆盖另一个单例
        model.place(6, 6, TileKind::Player2);
        model.place(6, 6, TileKind::Player1);
        assert_eq!(model.singleton(Singleton::Player2), None);
        assert_eq!(model.singleton(Singleton::Player1), Some(Cell::new(6, 6)));
        assert_singleton_invariant(&model);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut model = GridModel::default();
        let before = model.clone();

        assert!(model.place(-1, 0, TileKind::Brick).is_none());
        assert!(model.place(0, -1, TileKind::Brick).is_none());
        assert!(model.place(13, 0, TileKind::Brick).is_none());
        assert!(model.place(0, 13, TileKind::Player1).is_none());
        assert_eq!(model, before);
    }

    #[test]
    fn test_singleton_invariant_random_sequence() {
        let mut model = GridModel::new(5, 5);
        let kinds = TileKind::ALL;
        // 简单线性同余序列，覆盖大量放置组合
        let mut seed: u64 = 12345;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let row = ((seed >> 33) % 7) as i64 - 1;
            let col = ((seed >> 17) % 7) as i64 - 1;
            let kind = kinds[((seed >> 41) % kinds.len() as u64) as usize];
            model.place(row, col, kind);
            assert_singleton_invariant(&model);
        }
    }

    #[test]
    fn test_clear() {
        let mut model = GridModel::default();
        model.place(0, 0, TileKind::Player1);
        model.place(0, 1, TileKind::Player2);
        model.place(12, 6, TileKind::Base);
        model.place(3, 3, TileKind::Forest);
        assert!(model.readiness().is_ready());

        model.clear();
        let snapshot = model.snapshot();
        assert!(snapshot.cells.iter().all(|kind| *kind == TileKind::Empty));
        assert_eq!(snapshot.readiness(), Readiness::default());
    }

    #[test]
    fn test_readiness_missing_order() {
        let mut model = GridModel::default();
        model.place(0, 0, TileKind::Player2);

        let readiness = model.readiness();
        assert!(!readiness.is_ready());
        assert_eq!(readiness.missing(), vec![Singleton::Player1, Singleton::Base]);
        assert_eq!(readiness, model.snapshot().readiness());
    }

    #[test]
    fn test_paint_uses_selection() {
        let mut model = GridModel::default();
        assert_eq!(model.selected(), TileKind::Brick);

        model.select(TileKind::EnemyHeavy);
        model.paint(7, 8);
        assert_eq!(model.get(Cell::new(7, 8)), Some(TileKind::EnemyHeavy));

        // 指针落在 (row 1, col 2) 单元格内部
        model.select(TileKind::Steel);
        model.paint_at_pointer(PixelPoint::new(2 * 46 + 5, 46 + 40));
        assert_eq!(model.get(Cell::new(1, 2)), Some(TileKind::Steel));

        // 画布外的拖动
        assert!(model.paint_at_pointer(PixelPoint::new(-3, 10)).is_none());
    }
}
