//! 编辑器设置
//!
//! 设置以 JSON 保存在配置目录下，缺失的字段使用默认值。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use level::{LevelMetadata, TileKind, GRID_COLS, GRID_ROWS, MAX_GRID_DIM};
use serde::{Deserialize, Serialize};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// `EnvFilter` 指令中的级别名
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// 在当前级别上提高 `steps` 级详细程度
    pub fn raised(self, steps: u8) -> Self {
        (0..steps).fold(self, |level, _| match level {
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
        })
    }
}

/// 编辑器设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    // === 关卡 ===
    /// 新关卡的元数据
    pub metadata: LevelMetadata,
    /// 新关卡的行数
    pub rows: usize,
    /// 新关卡的列数
    pub cols: usize,

    // === 编辑 ===
    /// 启动时选中的图块
    pub default_tile: TileKind,

    // === 高级 ===
    /// 日志级别
    pub log_level: LogLevel,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            metadata: LevelMetadata::default(),
            rows: GRID_ROWS,
            cols: GRID_COLS,
            default_tile: TileKind::Brick,
            log_level: LogLevel::default(),
        }
    }
}

impl EditorSettings {
    /// 默认设置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("tank-level-editor");
            path.push("settings.json");
            path
        })
    }

    /// 读取设置文件，文件不存在时返回 `None`
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取设置文件: {:?}", path))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("设置文件格式无效: {:?}", path))?;
        settings.check()?;
        Ok(Some(settings))
    }

    /// 处理 [`read`](Self::read) 的结果，失败时使用默认设置
    ///
    /// 设置需要在日志初始化之前读取，日志则在初始化之后由这里补记。
    pub fn resolve(path: Option<&Path>, loaded: Result<Option<Self>>) -> Self {
        match loaded {
            Ok(Some(settings)) => {
                tracing::info!("已加载设置: {:?}", path);
                settings
            }
            Ok(None) => {
                tracing::info!("设置文件不存在，使用默认设置");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{:#}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到文件
    pub fn save(&self, path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content)
            .with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }

    fn check(&self) -> Result<()> {
        let valid = 1..=MAX_GRID_DIM;
        if !valid.contains(&self.rows) || !valid.contains(&self.cols) {
            anyhow::bail!(
                "网格尺寸 {}x{} 超出范围 (1..={})",
                self.rows,
                self.cols,
                MAX_GRID_DIM
            );
        }
        Ok(())
    }
}
