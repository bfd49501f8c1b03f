//! 通用 XML 元素树
//!
//! 只保留元素名、属性和子元素；注释、声明、处理指令被忽略，
//! 非空白文本视为模式错误（关卡文档中不允许出现文本内容）。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{LevelError, Result};

/// XML 元素
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    /// 按文档顺序保存的属性
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 获取属性值
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 第一个同名子元素
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// 所有同名子元素
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// 解析整篇文档，返回根元素
    pub fn parse(text: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    // 标签配对由 reader 检查
                    let element = stack
                        .pop()
                        .ok_or_else(|| LevelError::schema("/", "unbalanced closing tag"))?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if !String::from_utf8_lossy(&text).trim().is_empty() {
                        return Err(LevelError::schema(
                            Self::stack_path(&stack),
                            "text content is not allowed",
                        ));
                    }
                }
                Event::CData(_) => {
                    return Err(LevelError::schema(
                        Self::stack_path(&stack),
                        "CDATA content is not allowed",
                    ));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(LevelError::schema(
                Self::stack_path(&stack),
                "document ends before element is closed",
            ));
        }

        root.ok_or_else(|| LevelError::schema("/", "document has no root element"))
    }

    fn open(start: &BytesStart<'_>) -> Result<XmlElement> {
        let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
        } else if root.is_some() {
            return Err(LevelError::schema(
                format!("/{}", element.name),
                "more than one root element",
            ));
        } else {
            *root = Some(element);
        }
        Ok(())
    }

    fn stack_path(stack: &[XmlElement]) -> String {
        if stack.is_empty() {
            return "/".to_string();
        }
        stack.iter().fold(String::new(), |mut path, element| {
            path.push('/');
            path.push_str(&element.name);
            path
        })
    }
}
