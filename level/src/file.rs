//! 关卡文件读写
//!
//! 写入时先完整序列化到内存，再写入同目录下的临时文件并重命名，
//! 目标文件要么是旧内容，要么是完整的新文档。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::document::LevelDocument;
use crate::error::Result;

/// 将文档写入文件
pub fn write_level(path: &Path, document: &LevelDocument) -> Result<()> {
    let text = document.to_xml()?;
    let temp = temp_path(path);

    let written = fs::write(&temp, text.as_bytes()).and_then(|_| fs::rename(&temp, path));
    if let Err(e) = written {
        if temp.exists() {
            if let Err(cleanup) = fs::remove_file(&temp) {
                warn!("无法删除临时文件 {:?}: {}", temp, cleanup);
            }
        }
        return Err(e.into());
    }

    info!("关卡已导出: {:?} ({} 个条目)", path, document.entry_count());
    Ok(())
}

/// 读取并校验关卡文件
pub fn read_level(path: &Path) -> Result<LevelDocument> {
    let text = fs::read_to_string(path)?;
    match LevelDocument::parse(&text) {
        Ok(document) => {
            info!("关卡已读取: {:?}", path);
            Ok(document)
        }
        Err(e) => {
            warn!("关卡文件无效 {:?}: {}", path, e);
            Err(e)
        }
    }
}

/// 同目录下的临时文件名
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "level".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
