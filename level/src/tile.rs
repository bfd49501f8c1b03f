//! 图块种类与文档子类型
//!
//! 网格中的 [`TileKind`] 与文档中的 [`DocumentSubtype`] 是两个封闭枚举，
//! 二者之间的映射在两个方向上都用穷举 `match` 写出。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 单元格图块种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// 空地
    #[default]
    Empty,
    /// 砖墙
    Brick,
    /// 钢墙
    Steel,
    /// 水面
    Water,
    /// 树林
    Forest,
    /// 基地（单例）
    Base,
    /// 玩家 1 出生点（单例）
    Player1,
    /// 玩家 2 出生点（单例）
    Player2,
    /// 普通敌方坦克
    EnemyRegular,
    /// 重型敌方坦克
    EnemyHeavy,
    /// 快速敌方坦克
    EnemyFast,
    /// 强力敌方坦克
    EnemyPowerful,
}

impl TileKind {
    /// 所有图块种类（调色板顺序）
    pub const ALL: [TileKind; 12] = [
        TileKind::Player1,
        TileKind::Player2,
        TileKind::EnemyRegular,
        TileKind::EnemyHeavy,
        TileKind::EnemyFast,
        TileKind::EnemyPowerful,
        TileKind::Base,
        TileKind::Brick,
        TileKind::Steel,
        TileKind::Water,
        TileKind::Forest,
        TileKind::Empty,
    ];

    /// 编辑器内部使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Empty => "empty",
            TileKind::Brick => "brick",
            TileKind::Steel => "steel",
            TileKind::Water => "water",
            TileKind::Forest => "forest",
            TileKind::Base => "base",
            TileKind::Player1 => "player1",
            TileKind::Player2 => "player2",
            TileKind::EnemyRegular => "enemy_regular",
            TileKind::EnemyHeavy => "enemy_heavy",
            TileKind::EnemyFast => "enemy_fast",
            TileKind::EnemyPowerful => "enemy_powerful",
        }
    }

    /// 调色板上显示的名称
    pub fn label(&self) -> &'static str {
        match self {
            TileKind::Empty => "Empty",
            TileKind::Brick => "Brick",
            TileKind::Steel => "Steel",
            TileKind::Water => "Water",
            TileKind::Forest => "Forest",
            TileKind::Base => "Base",
            TileKind::Player1 => "Player 1",
            TileKind::Player2 => "Player 2",
            TileKind::EnemyRegular => "Enemy Tank (Regular)",
            TileKind::EnemyHeavy => "Enemy Tank (Heavy)",
            TileKind::EnemyFast => "Enemy Tank (Fast)",
            TileKind::EnemyPowerful => "Enemy Tank (Powerful)",
        }
    }

    /// 文本渲染用的单字符
    pub fn glyph(&self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Brick => '#',
            TileKind::Steel => '=',
            TileKind::Water => '~',
            TileKind::Forest => '%',
            TileKind::Base => 'B',
            TileKind::Player1 => '1',
            TileKind::Player2 => '2',
            TileKind::EnemyRegular => 'r',
            TileKind::EnemyHeavy => 'h',
            TileKind::EnemyFast => 'f',
            TileKind::EnemyPowerful => 'p',
        }
    }

    /// 对应的单例实体（仅玩家与基地）
    pub fn singleton(&self) -> Option<Singleton> {
        match self {
            TileKind::Player1 => Some(Singleton::Player1),
            TileKind::Player2 => Some(Singleton::Player2),
            TileKind::Base => Some(Singleton::Base),
            TileKind::Empty
            | TileKind::Brick
            | TileKind::Steel
            | TileKind::Water
            | TileKind::Forest
            | TileKind::EnemyRegular
            | TileKind::EnemyHeavy
            | TileKind::EnemyFast
            | TileKind::EnemyPowerful => None,
        }
    }

    /// 对应的文档子类型，空地没有文档表示
    pub fn subtype(&self) -> Option<DocumentSubtype> {
        match self {
            TileKind::Empty => None,
            TileKind::Player1 => Some(DocumentSubtype::Player1),
            TileKind::Player2 => Some(DocumentSubtype::Player2),
            TileKind::EnemyRegular => Some(DocumentSubtype::RegularEnemy),
            TileKind::EnemyHeavy => Some(DocumentSubtype::HeavyEnemy),
            TileKind::EnemyFast => Some(DocumentSubtype::FastEnemy),
            TileKind::EnemyPowerful => Some(DocumentSubtype::PowerfulEnemy),
            TileKind::Brick => Some(DocumentSubtype::BrickBlock),
            TileKind::Steel => Some(DocumentSubtype::SteelBlock),
            TileKind::Water => Some(DocumentSubtype::WaterBlock),
            TileKind::Forest => Some(DocumentSubtype::ForestBlock),
            TileKind::Base => Some(DocumentSubtype::BaseBlock),
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown tile kind: {}", s))
    }
}

/// 单例实体：网格中至多出现一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Singleton {
    Player1,
    Player2,
    Base,
}

impl Singleton {
    /// 固定顺序，用于状态栏提示
    pub const ALL: [Singleton; 3] = [Singleton::Player1, Singleton::Player2, Singleton::Base];

    /// 对应的图块种类
    pub fn tile(&self) -> TileKind {
        match self {
            Singleton::Player1 => TileKind::Player1,
            Singleton::Player2 => TileKind::Player2,
            Singleton::Base => TileKind::Base,
        }
    }

    /// 在跟踪数组中的下标
    pub(crate) fn index(&self) -> usize {
        match self {
            Singleton::Player1 => 0,
            Singleton::Player2 => 1,
            Singleton::Base => 2,
        }
    }

    /// 显示名称
    pub fn label(&self) -> &'static str {
        self.tile().label()
    }
}

/// 文档中的集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `<players>`
    Players,
    /// `<enemies>`
    Enemies,
    /// `<staticObjects>`
    StaticObjects,
}

/// 文档子类型
///
/// 玩家子类型写在 `player` 的 `id` 属性上，其余写在 `type` 属性上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSubtype {
    Player1,
    Player2,
    RegularEnemy,
    HeavyEnemy,
    FastEnemy,
    PowerfulEnemy,
    BrickBlock,
    SteelBlock,
    WaterBlock,
    ForestBlock,
    BaseBlock,
}

impl DocumentSubtype {
    /// 所有子类型
    pub const ALL: [DocumentSubtype; 11] = [
        DocumentSubtype::Player1,
        DocumentSubtype::Player2,
        DocumentSubtype::RegularEnemy,
        DocumentSubtype::HeavyEnemy,
        DocumentSubtype::FastEnemy,
        DocumentSubtype::PowerfulEnemy,
        DocumentSubtype::BrickBlock,
        DocumentSubtype::SteelBlock,
        DocumentSubtype::WaterBlock,
        DocumentSubtype::ForestBlock,
        DocumentSubtype::BaseBlock,
    ];

    /// 文档中的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSubtype::Player1 => "player1",
            DocumentSubtype::Player2 => "player2",
            DocumentSubtype::RegularEnemy => "regularEnemy",
            DocumentSubtype::HeavyEnemy => "heavyEnemy",
            DocumentSubtype::FastEnemy => "fastEnemy",
            DocumentSubtype::PowerfulEnemy => "powerfulEnemy",
            DocumentSubtype::BrickBlock => "brickBlock",
            DocumentSubtype::SteelBlock => "steelBlock",
            DocumentSubtype::WaterBlock => "waterBlock",
            DocumentSubtype::ForestBlock => "forestBlock",
            DocumentSubtype::BaseBlock => "baseBlock",
        }
    }

    /// 对应的图块种类（全映射）
    pub fn tile(&self) -> TileKind {
        match self {
            DocumentSubtype::Player1 => TileKind::Player1,
            DocumentSubtype::Player2 => TileKind::Player2,
            DocumentSubtype::RegularEnemy => TileKind::EnemyRegular,
            DocumentSubtype::HeavyEnemy => TileKind::EnemyHeavy,
            DocumentSubtype::FastEnemy => TileKind::EnemyFast,
            DocumentSubtype::PowerfulEnemy => TileKind::EnemyPowerful,
            DocumentSubtype::BrickBlock => TileKind::Brick,
            DocumentSubtype::SteelBlock => TileKind::Steel,
            DocumentSubtype::WaterBlock => TileKind::Water,
            DocumentSubtype::ForestBlock => TileKind::Forest,
            DocumentSubtype::BaseBlock => TileKind::Base,
        }
    }

    /// 所属的文档集合
    pub fn collection(&self) -> Collection {
        match self {
            DocumentSubtype::Player1 | DocumentSubtype::Player2 => Collection::Players,
            DocumentSubtype::RegularEnemy
            | DocumentSubtype::HeavyEnemy
            | DocumentSubtype::FastEnemy
            | DocumentSubtype::PowerfulEnemy => Collection::Enemies,
            DocumentSubtype::BrickBlock
            | DocumentSubtype::SteelBlock
            | DocumentSubtype::WaterBlock
            | DocumentSubtype::ForestBlock
            | DocumentSubtype::BaseBlock => Collection::StaticObjects,
        }
    }

    /// 按集合解析名称，名称存在但属于别的集合时同样视为未知
    pub fn parse_in(collection: Collection, name: &str) -> Option<DocumentSubtype> {
        DocumentSubtype::ALL
            .iter()
            .copied()
            .find(|subtype| subtype.collection() == collection && subtype.as_str() == name)
    }
}

impl fmt::Display for DocumentSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_bijective() {
        for kind in TileKind::ALL {
            match kind.subtype() {
                Some(subtype) => assert_eq!(subtype.tile(), kind),
                None => assert_eq!(kind, TileKind::Empty),
            }
        }
        for subtype in DocumentSubtype::ALL {
            assert_eq!(subtype.tile().subtype(), Some(subtype));
        }
    }

    #[test]
    fn test_base_is_static_object() {
        assert_eq!(
            TileKind::Base.subtype().map(|s| s.collection()),
            Some(Collection::StaticObjects)
        );
        assert_eq!(TileKind::Base.singleton(), Some(Singleton::Base));
    }

    #[test]
    fn test_parse_in_collection() {
        assert_eq!(
            DocumentSubtype::parse_in(Collection::Enemies, "heavyEnemy"),
            Some(DocumentSubtype::HeavyEnemy)
        );
        // 名称正确但集合不符
        assert_eq!(DocumentSubtype::parse_in(Collection::Enemies, "brickBlock"), None);
        assert_eq!(DocumentSubtype::parse_in(Collection::StaticObjects, "lavaBlock"), None);
        assert_eq!(
            DocumentSubtype::parse_in(Collection::Players, "player2"),
            Some(DocumentSubtype::Player2)
        );
    }

    #[test]
    fn test_tile_kind_from_str() {
        assert_eq!("enemy_fast".parse::<TileKind>(), Ok(TileKind::EnemyFast));
        assert_eq!("empty".parse::<TileKind>(), Ok(TileKind::Empty));
        assert!("lava".parse::<TileKind>().is_err());
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let mut glyphs: Vec<char> = TileKind::ALL.iter().map(|k| k.glyph()).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), TileKind::ALL.len());
    }
}
