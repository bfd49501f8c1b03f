//! 关卡文档模式（levelConfig.xsd）
//!
//! 模式以静态规则表的形式编译进本库，对应的模式文档随库放在
//! `levelConfig.xsd`。校验对整棵元素树进行，在构造任何网格之前完成。
//!
//! ```text
//! levelConfig   gameName version name: string, levelIndex: 非负整数
//! └─ level      width height cols rows: 正整数
//!    ├─ players        player{0,2}       id, x, y
//!    ├─ enemies        enemy*            id, type, x, y
//!    └─ staticObjects  staticObject*     type, x, y
//! ```

use crate::constants::{MAX_PLAYERS, ROOT_ELEMENT};
use crate::error::{LevelError, Result};
use crate::xml::XmlElement;

/// 属性值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// 任意字符串
    String,
    /// 任意整数
    Integer,
    /// 非负整数
    NonNegativeInteger,
    /// 正整数
    PositiveInteger,
}

/// 属性规则（所有属性均为必需）
#[derive(Debug)]
pub struct AttrRule {
    pub name: &'static str,
    pub ty: AttrType,
}

/// 子元素规则（按序列出现）
#[derive(Debug)]
pub struct ChildRule {
    pub element: &'static ElementRule,
    pub min: usize,
    /// `None` 表示不限
    pub max: Option<usize>,
}

/// 元素规则
#[derive(Debug)]
pub struct ElementRule {
    pub name: &'static str,
    pub attributes: &'static [AttrRule],
    pub children: &'static [ChildRule],
}

const fn attr(name: &'static str, ty: AttrType) -> AttrRule {
    AttrRule { name, ty }
}

static PLAYER: ElementRule = ElementRule {
    name: "player",
    attributes: &[
        attr("id", AttrType::String),
        attr("x", AttrType::Integer),
        attr("y", AttrType::Integer),
    ],
    children: &[],
};

static ENEMY: ElementRule = ElementRule {
    name: "enemy",
    attributes: &[
        attr("id", AttrType::String),
        attr("type", AttrType::String),
        attr("x", AttrType::Integer),
        attr("y", AttrType::Integer),
    ],
    children: &[],
};

static STATIC_OBJECT: ElementRule = ElementRule {
    name: "staticObject",
    attributes: &[
        attr("type", AttrType::String),
        attr("x", AttrType::Integer),
        attr("y", AttrType::Integer),
    ],
    children: &[],
};

static PLAYERS: ElementRule = ElementRule {
    name: "players",
    attributes: &[],
    children: &[ChildRule {
        element: &PLAYER,
        min: 0,
        max: Some(MAX_PLAYERS),
    }],
};

static ENEMIES: ElementRule = ElementRule {
    name: "enemies",
    attributes: &[],
    children: &[ChildRule {
        element: &ENEMY,
        min: 0,
        max: None,
    }],
};

static STATIC_OBJECTS: ElementRule = ElementRule {
    name: "staticObjects",
    attributes: &[],
    children: &[ChildRule {
        element: &STATIC_OBJECT,
        min: 0,
        max: None,
    }],
};

static LEVEL: ElementRule = ElementRule {
    name: "level",
    attributes: &[
        attr("width", AttrType::PositiveInteger),
        attr("height", AttrType::PositiveInteger),
        attr("cols", AttrType::PositiveInteger),
        attr("rows", AttrType::PositiveInteger),
    ],
    children: &[
        ChildRule {
            element: &PLAYERS,
            min: 1,
            max: Some(1),
        },
        ChildRule {
            element: &ENEMIES,
            min: 1,
            max: Some(1),
        },
        ChildRule {
            element: &STATIC_OBJECTS,
            min: 1,
            max: Some(1),
        },
    ],
};

/// 关卡文档模式的根规则
pub static LEVEL_CONFIG: ElementRule = ElementRule {
    name: ROOT_ELEMENT,
    attributes: &[
        attr("gameName", AttrType::String),
        attr("version", AttrType::String),
        attr("levelIndex", AttrType::NonNegativeInteger),
        attr("name", AttrType::String),
    ],
    children: &[ChildRule {
        element: &LEVEL,
        min: 1,
        max: Some(1),
    }],
};

/// 按关卡模式校验整棵元素树
pub fn validate(root: &XmlElement) -> Result<()> {
    if root.name != LEVEL_CONFIG.name {
        return Err(LevelError::schema(
            format!("/{}", root.name),
            format!("expected root element <{}>", LEVEL_CONFIG.name),
        ));
    }
    validate_element(root, &LEVEL_CONFIG, &format!("/{}", root.name))
}

fn validate_element(element: &XmlElement, rule: &ElementRule, path: &str) -> Result<()> {
    for attr_rule in rule.attributes {
        let value = element.attribute(attr_rule.name).ok_or_else(|| {
            LevelError::schema(
                path,
                format!("missing required attribute `{}`", attr_rule.name),
            )
        })?;
        check_value(value, attr_rule, path)?;
    }

    if let Some((key, _)) = element
        .attributes
        .iter()
        .find(|(key, _)| !rule.attributes.iter().any(|attr_rule| attr_rule.name == key))
    {
        return Err(LevelError::schema(
            path,
            format!("unexpected attribute `{}`", key),
        ));
    }

    let mut children = element.children.iter().peekable();
    for child_rule in rule.children {
        let name = child_rule.element.name;
        let mut count = 0;
        while let Some(child) = children.next_if(|child| child.name == name) {
            count += 1;
            let child_path = format!("{}/{}[{}]", path, name, count);
            if child_rule.max.is_some_and(|max| count > max) {
                return Err(LevelError::schema(
                    child_path,
                    format!("too many <{}> elements (max {})", name, child_rule.max.unwrap_or(0)),
                ));
            }
            validate_element(child, child_rule.element, &child_path)?;
        }

        if count < child_rule.min {
            let reason = match children.peek() {
                Some(found) => format!("expected <{}>, found <{}>", name, found.name),
                None => format!("missing required child <{}>", name),
            };
            return Err(LevelError::schema(path, reason));
        }
    }

    if let Some(extra) = children.next() {
        return Err(LevelError::schema(
            path,
            format!("unexpected element <{}>", extra.name),
        ));
    }

    Ok(())
}

fn check_value(value: &str, rule: &AttrRule, path: &str) -> Result<()> {
    let invalid = |expected: &str| {
        LevelError::schema(
            path,
            format!("attribute `{}` must be {}, got {:?}", rule.name, expected, value),
        )
    };

    match rule.ty {
        AttrType::String => Ok(()),
        AttrType::Integer => parse_integer(value).map(|_| ()).ok_or_else(|| invalid("an integer")),
        AttrType::NonNegativeInteger => match parse_integer(value) {
            Some(n) if n >= 0 => Ok(()),
            _ => Err(invalid("a non-negative integer")),
        },
        AttrType::PositiveInteger => match parse_integer(value) {
            Some(n) if n > 0 => Ok(()),
            _ => Err(invalid("a positive integer")),
        },
    }
}

/// 解析整数属性（允许前后空白，与 XSD 的空白折叠一致）
pub(crate) fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}
