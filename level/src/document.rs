//! 关卡文档
//!
//! 文档格式（XML，UTF-8，4 空格缩进）：
//!
//! ```xml
//! <levelConfig gameName="BattleCity" version="1.0" levelIndex="1" name="Level 1">
//!     <level width="598" height="598" cols="13" rows="13">
//!         <players>
//!             <player id="player1" x="23" y="575"/>
//!         </players>
//!         <enemies>
//!             <enemy id="enemy0_6" type="fastEnemy" x="299" y="23"/>
//!         </enemies>
//!         <staticObjects>
//!             <staticObject type="baseBlock" x="299" y="575"/>
//!         </staticObjects>
//!     </level>
//! </levelConfig>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GAME_NAME, DEFAULT_LEVEL_INDEX, DEFAULT_LEVEL_NAME, DEFAULT_VERSION, INDENT_WIDTH,
    MAX_GRID_DIM, ROOT_ELEMENT,
};
use crate::coords::PixelPoint;
use crate::error::{LevelError, Result};
use crate::schema::{self, parse_integer};
use crate::tile::{Collection, DocumentSubtype};
use crate::xml::XmlElement;

/// 根元素上的关卡描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMetadata {
    /// 游戏名
    pub game_name: String,
    /// 文档版本
    pub version: String,
    /// 关卡序号
    pub level_index: u32,
    /// 关卡名称
    pub name: String,
}

impl Default for LevelMetadata {
    fn default() -> Self {
        Self {
            game_name: DEFAULT_GAME_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            level_index: DEFAULT_LEVEL_INDEX,
            name: DEFAULT_LEVEL_NAME.to_string(),
        }
    }
}

/// `<level>` 元素上的尺寸信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLayout {
    /// 像素宽度
    pub width: i32,
    /// 像素高度
    pub height: i32,
    pub cols: usize,
    pub rows: usize,
}

/// 玩家条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerEntry {
    /// `Player1` 或 `Player2`
    pub subtype: DocumentSubtype,
    pub position: PixelPoint,
}

/// 敌人条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyEntry {
    /// 合成 ID，如 `enemy3_4`
    pub id: String,
    pub subtype: DocumentSubtype,
    pub position: PixelPoint,
}

/// 静态物体条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEntry {
    pub subtype: DocumentSubtype,
    pub position: PixelPoint,
}

/// 关卡文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDocument {
    pub metadata: LevelMetadata,
    pub layout: LevelLayout,
    pub players: Vec<PlayerEntry>,
    pub enemies: Vec<EnemyEntry>,
    pub static_objects: Vec<StaticEntry>,
}

impl LevelDocument {
    /// 解析并校验文档文本
    pub fn parse(text: &str) -> Result<Self> {
        let root = XmlElement::parse(text)?;
        schema::validate(&root)?;
        Self::from_element(&root)
    }

    /// 从已通过模式校验的元素树构造文档
    fn from_element(root: &XmlElement) -> Result<Self> {
        let metadata = LevelMetadata {
            game_name: text_attr(root, "gameName")?.to_string(),
            version: text_attr(root, "version")?.to_string(),
            level_index: number_attr(root, "levelIndex")?,
            name: text_attr(root, "name")?.to_string(),
        };

        let level = child(root, "level")?;
        let layout = LevelLayout {
            width: number_attr(level, "width")?,
            height: number_attr(level, "height")?,
            cols: number_attr(level, "cols")?,
            rows: number_attr(level, "rows")?,
        };
        if layout.cols > MAX_GRID_DIM || layout.rows > MAX_GRID_DIM {
            return Err(LevelError::schema(
                format!("/{}/level", ROOT_ELEMENT),
                format!(
                    "grid {}x{} exceeds the maximum of {}x{}",
                    layout.rows, layout.cols, MAX_GRID_DIM, MAX_GRID_DIM
                ),
            ));
        }

        let players = child(level, "players")?
            .children_named("player")
            .map(|player| {
                Ok(PlayerEntry {
                    subtype: subtype_attr(player, "id", Collection::Players)?,
                    position: position(player)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let enemies = child(level, "enemies")?
            .children_named("enemy")
            .map(|enemy| {
                Ok(EnemyEntry {
                    id: text_attr(enemy, "id")?.to_string(),
                    subtype: subtype_attr(enemy, "type", Collection::Enemies)?,
                    position: position(enemy)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let static_objects = child(level, "staticObjects")?
            .children_named("staticObject")
            .map(|object| {
                Ok(StaticEntry {
                    subtype: subtype_attr(object, "type", Collection::StaticObjects)?,
                    position: position(object)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            metadata,
            layout,
            players,
            enemies,
            static_objects,
        })
    }

    /// 序列化为带缩进的 XML 文本
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        open(
            &mut writer,
            ROOT_ELEMENT,
            &[
                ("gameName", self.metadata.game_name.clone()),
                ("version", self.metadata.version.clone()),
                ("levelIndex", self.metadata.level_index.to_string()),
                ("name", self.metadata.name.clone()),
            ],
        )?;
        open(
            &mut writer,
            "level",
            &[
                ("width", self.layout.width.to_string()),
                ("height", self.layout.height.to_string()),
                ("cols", self.layout.cols.to_string()),
                ("rows", self.layout.rows.to_string()),
            ],
        )?;

        let players: Vec<Vec<(&str, String)>> = self
            .players
            .iter()
            .map(|player| {
                vec![
                    ("id", player.subtype.to_string()),
                    ("x", player.position.x.to_string()),
                    ("y", player.position.y.to_string()),
                ]
            })
            .collect();
        collection(&mut writer, "players", "player", &players)?;

        let enemies: Vec<Vec<(&str, String)>> = self
            .enemies
            .iter()
            .map(|enemy| {
                vec![
                    ("id", enemy.id.clone()),
                    ("type", enemy.subtype.to_string()),
                    ("x", enemy.position.x.to_string()),
                    ("y", enemy.position.y.to_string()),
                ]
            })
            .collect();
        collection(&mut writer, "enemies", "enemy", &enemies)?;

        let static_objects: Vec<Vec<(&str, String)>> = self
            .static_objects
            .iter()
            .map(|object| {
                vec![
                    ("type", object.subtype.to_string()),
                    ("x", object.position.x.to_string()),
                    ("y", object.position.y.to_string()),
                ]
            })
            .collect();
        collection(&mut writer, "staticObjects", "staticObject", &static_objects)?;

        close(&mut writer, "level")?;
        close(&mut writer, ROOT_ELEMENT)?;

        let mut text = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        text.push('\n');
        Ok(text)
    }

    /// 条目总数
    pub fn entry_count(&self) -> usize {
        self.players.len() + self.enemies.len() + self.static_objects.len()
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn start<'a>(name: &'a str, attributes: &'a [(&'a str, String)]) -> BytesStart<'a> {
    BytesStart::new(name).with_attributes(
        attributes
            .iter()
            .map(|(key, value)| (*key, value.as_str())),
    )
}

fn open(writer: &mut XmlWriter, name: &str, attributes: &[(&str, String)]) -> Result<()> {
    writer.write_event(Event::Start(start(name, attributes)))?;
    Ok(())
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// 写出一个集合；空集合写成自闭合元素
fn collection(
    writer: &mut XmlWriter,
    name: &str,
    item: &str,
    entries: &[Vec<(&str, String)>],
) -> Result<()> {
    if entries.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }

    open(writer, name, &[])?;
    for attributes in entries {
        writer.write_event(Event::Empty(start(item, attributes)))?;
    }
    close(writer, name)
}

fn element_path(element: &XmlElement) -> String {
    format!("<{}>", element.name)
}

fn child<'a>(element: &'a XmlElement, name: &str) -> Result<&'a XmlElement> {
    element.child(name).ok_or_else(|| {
        LevelError::schema(
            element_path(element),
            format!("missing required child <{}>", name),
        )
    })
}

fn text_attr<'a>(element: &'a XmlElement, name: &str) -> Result<&'a str> {
    element.attribute(name).ok_or_else(|| {
        LevelError::schema(
            element_path(element),
            format!("missing required attribute `{}`", name),
        )
    })
}

fn number_attr<T: TryFrom<i64>>(element: &XmlElement, name: &str) -> Result<T> {
    let value = text_attr(element, name)?;
    parse_integer(value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| {
            LevelError::schema(
                element_path(element),
                format!("attribute `{}` is out of range: {:?}", name, value),
            )
        })
}

fn subtype_attr(element: &XmlElement, name: &str, collection: Collection) -> Result<DocumentSubtype> {
    let value = text_attr(element, name)?;
    DocumentSubtype::parse_in(collection, value).ok_or_else(|| LevelError::UnknownTileType {
        element: element.name.clone(),
        value: value.to_string(),
    })
}

fn position(element: &XmlElement) -> Result<PixelPoint> {
    Ok(PixelPoint::new(
        number_attr(element, "x")?,
        number_attr(element, "y")?,
    ))
}
