//! 关卡常量定义

/// 单元格边长（像素），与游戏中方块宽度一致（600 / 13 取整）
pub const CELL_SIZE: i32 = 600 / 13;

/// 单元格中心相对左上角的偏移（像素）
pub const HALF_CELL: i32 = CELL_SIZE / 2;

/// 默认网格行数
pub const GRID_ROWS: usize = 13;

/// 默认网格列数
pub const GRID_COLS: usize = 13;

/// 网格单边最大尺寸（导入时用于拒绝异常文档）
pub const MAX_GRID_DIM: usize = 64;

/// 文档中最多允许的玩家条目数
pub const MAX_PLAYERS: usize = 2;

/// 模式文件名（编译进本库，报错时用于定位）
pub const SCHEMA_NAME: &str = "levelConfig.xsd";

/// 根元素名
pub const ROOT_ELEMENT: &str = "levelConfig";

/// 默认游戏名
pub const DEFAULT_GAME_NAME: &str = "BattleCity";

/// 默认文档版本
pub const DEFAULT_VERSION: &str = "1.0";

/// 默认关卡序号
pub const DEFAULT_LEVEL_INDEX: u32 = 1;

/// 默认关卡名称
pub const DEFAULT_LEVEL_NAME: &str = "Level 1";

/// 导出时的缩进宽度
pub const INDENT_WIDTH: usize = 4;
