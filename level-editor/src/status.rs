//! 导出状态提示

use std::fmt;

use level::Readiness;

/// 状态栏内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorStatus {
    /// 缺少的单例名称
    pub missing: Vec<&'static str>,
}

impl EditorStatus {
    pub fn from_readiness(readiness: &Readiness) -> Self {
        Self {
            missing: readiness
                .missing()
                .into_iter()
                .map(|singleton| singleton.label())
                .collect(),
        }
    }

    /// 是否允许导出
    pub fn can_export(&self) -> bool {
        self.missing.is_empty()
    }
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.missing.is_empty() {
            f.write_str("Ready to export")
        } else {
            write!(f, "Missing: {}", self.missing.join(", "))
        }
    }
}
