//! 坦克大战关卡编辑器
//!
//! 无界面的编辑会话、设置、文本渲染和命令行参数定义。
//! 图形界面只需转发指针与工具栏事件并订阅变更通知。

pub mod cli;
pub mod render;
pub mod session;
pub mod settings;
pub mod status;

pub use session::{ChangeEvent, EditorSession};
pub use settings::{EditorSettings, LogLevel};
pub use status::EditorStatus;
