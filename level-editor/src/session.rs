//! 编辑会话
//!
//! 表现层只与 [`EditorSession`] 交互：转发指针与工具栏动作，订阅变更通知后
//! 根据模型状态重绘。导入先在独立的模型上完成全部校验，成功后才替换当前模型。

use std::path::Path;

use level::{
    read_level, write_level, GridModel, GridSnapshot, LevelCodec, LevelError, LevelMetadata,
    PixelPoint, Placement, Readiness, TileKind,
};
use tracing::{debug, info, warn};

use crate::settings::EditorSettings;
use crate::status::EditorStatus;

/// 变更通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// 放置了图块（可能同时清空了单例的旧位置）
    Placed(Placement),
    /// 网格被清空
    Cleared,
    /// 导入后整个模型被替换
    Replaced,
}

type Listener = Box<dyn FnMut(&ChangeEvent, &GridModel)>;

/// 编辑会话
pub struct EditorSession {
    /// 当前网格
    model: GridModel,
    /// 导出时写入根元素的关卡描述
    metadata: LevelMetadata,
    /// 变更订阅者
    listeners: Vec<Listener>,
    /// 是否有未导出的修改
    is_modified: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(GridModel::default(), LevelMetadata::default())
    }
}

impl EditorSession {
    pub fn new(model: GridModel, metadata: LevelMetadata) -> Self {
        Self {
            model,
            metadata,
            listeners: Vec::new(),
            is_modified: false,
        }
    }

    /// 按设置创建空白关卡
    pub fn from_settings(settings: &EditorSettings) -> Self {
        let mut model = GridModel::new(settings.rows, settings.cols);
        model.select(settings.default_tile);
        Self::new(model, settings.metadata.clone())
    }

    /// 订阅变更通知，每次成功修改后调用
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent, &GridModel) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn metadata(&self) -> &LevelMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: LevelMetadata) {
        if self.metadata != metadata {
            self.metadata = metadata;
            self.is_modified = true;
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// 放置图块，返回网格是否变化
    pub fn place(&mut self, row: i64, col: i64, kind: TileKind) -> bool {
        let placement = self.model.place(row, col, kind);
        self.after_place(placement)
    }

    /// 用选中的图块放置
    pub fn paint(&mut self, row: i64, col: i64) -> bool {
        let placement = self.model.paint(row, col);
        self.after_place(placement)
    }

    /// 指针按下或拖动
    pub fn paint_at_pointer(&mut self, pointer: PixelPoint) -> bool {
        let placement = self.model.paint_at_pointer(pointer);
        self.after_place(placement)
    }

    /// 选择图块
    pub fn select(&mut self, kind: TileKind) {
        self.model.select(kind);
    }

    pub fn selected(&self) -> TileKind {
        self.model.selected()
    }

    /// 清空网格
    pub fn clear(&mut self) {
        self.model.clear();
        self.is_modified = true;
        self.notify(ChangeEvent::Cleared);
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.model.snapshot()
    }

    pub fn readiness(&self) -> Readiness {
        self.model.readiness()
    }

    /// 状态栏内容
    pub fn status(&self) -> EditorStatus {
        EditorStatus::from_readiness(&self.readiness())
    }

    /// 导出到文件，缺少单例时拒绝
    pub fn export(&mut self, path: &Path) -> Result<(), LevelError> {
        let status = self.status();
        if !status.can_export() {
            return Err(LevelError::NotReady {
                missing: status.missing.iter().map(|name| name.to_string()).collect(),
            });
        }
        self.export_incomplete(path)
    }

    /// 导出到文件，不检查单例（未放置的单例直接省略）
    pub fn export_incomplete(&mut self, path: &Path) -> Result<(), LevelError> {
        let document = LevelCodec::export(&self.model.snapshot(), &self.metadata);
        write_level(path, &document)?;
        self.is_modified = false;
        Ok(())
    }

    /// 从文件导入
    ///
    /// 失败时当前模型、元数据和修改标记都保持不变。
    pub fn import(&mut self, path: &Path) -> Result<(), LevelError> {
        let document = read_level(path)?;
        let mut model = match LevelCodec::import(&document) {
            Ok(model) => model,
            Err(e) => {
                warn!("导入失败 {:?}: {}", path, e);
                return Err(e);
            }
        };
        model.select(self.model.selected());

        self.model = model;
        self.metadata = document.metadata;
        self.is_modified = false;
        info!("已导入关卡 {:?}: {}", self.metadata.name, self.status());
        self.notify(ChangeEvent::Replaced);
        Ok(())
    }

    fn after_place(&mut self, placement: Option<Placement>) -> bool {
        match placement {
            Some(placement) => {
                tracing::trace!(
                    "需要重绘: {:?}",
                    placement.dirty_cells().collect::<Vec<_>>()
                );
                self.is_modified = true;
                self.notify(ChangeEvent::Placed(placement));
                true
            }
            None => false,
        }
    }

    fn notify(&mut self, event: ChangeEvent) {
        debug!("变更通知: {:?}", event);
        for listener in &mut self.listeners {
            listener(&event, &self.model);
        }
    }
}
