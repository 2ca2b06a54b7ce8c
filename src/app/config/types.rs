//! 配置字段类型定义
//!
//! 包含三态布尔、命令前缀、语言枚举，以及校验器使用的字段类型描述符

use std::fmt;

/// 三态布尔：显式 true、显式 false、留空
///
/// 留空与显式 false 在序列化时不同：留空字段默认不写入文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    /// 留空
    #[default]
    Blank,
    /// 显式开启
    True,
    /// 显式关闭
    False,
}

impl TriState {
    /// 是否为留空状态
    pub fn is_blank(&self) -> bool {
        matches!(self, TriState::Blank)
    }

    /// 读取布尔值，留空视为 false
    pub fn as_bool(&self) -> bool {
        matches!(self, TriState::True)
    }

    /// 转换为可选布尔
    pub fn to_option(self) -> Option<bool> {
        match self {
            TriState::Blank => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map(TriState::from).unwrap_or_default()
    }
}

/// 命令前缀：单个字符串或字符串列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPrefix {
    /// 单个前缀
    Single(String),
    /// 多个前缀（读取时去重）
    Many(Vec<String>),
}

impl CommandPrefix {
    /// 由列表构造，保留首次出现的顺序去重
    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for item in items {
            let item = item.into();
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        CommandPrefix::Many(unique)
    }

    /// 全部前缀
    pub fn as_slice(&self) -> &[String] {
        match self {
            CommandPrefix::Single(prefix) => std::slice::from_ref(prefix),
            CommandPrefix::Many(prefixes) => prefixes,
        }
    }
}

impl Default for CommandPrefix {
    fn default() -> Self {
        CommandPrefix::Single(DEFAULT_COMMAND_PREFIX.to_string())
    }
}

/// 默认命令前缀
pub const DEFAULT_COMMAND_PREFIX: &str = "!!template";

/// 可按成员名解析的枚举
///
/// 成员名只保存在 `DESCRIPTOR` 中，`members()` 按相同顺序列出成员，
/// 名称与下标都由二者的位置对应得出。
pub trait NamedEnum: Sized + Copy + PartialEq + 'static {
    /// 枚举描述符
    const DESCRIPTOR: EnumDescriptor;

    /// 全部成员，顺序与描述符中的名称一致
    fn members() -> &'static [Self];

    /// 成员下标
    fn index(&self) -> Option<usize> {
        Self::members().iter().position(|member| member == self)
    }

    /// 成员名
    fn name(&self) -> &'static str {
        self.index()
            .and_then(|index| Self::DESCRIPTOR.members.get(index))
            .copied()
            .unwrap_or_default()
    }

    /// 按下标取成员
    fn from_index(index: usize) -> Option<Self> {
        Self::members().get(index).copied()
    }

    /// 按成员名查找（大小写敏感）
    fn from_name(name: &str) -> Option<Self> {
        Self::DESCRIPTOR.position(name).and_then(Self::from_index)
    }
}

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum Locale {
    /// 英语
    #[default]
    en_us,
    /// 简体中文
    zh_cn,
}

impl NamedEnum for Locale {
    const DESCRIPTOR: EnumDescriptor = EnumDescriptor {
        name: "Locale",
        members: &["en_us", "zh_cn"],
    };

    fn members() -> &'static [Self] {
        &[Locale::en_us, Locale::zh_cn]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 枚举描述符：枚举名与允许的成员名集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// 枚举名
    pub name: &'static str,
    /// 成员名
    pub members: &'static [&'static str],
}

impl EnumDescriptor {
    /// 查找成员下标
    pub fn position(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|member| *member == name)
    }
}

/// 字段类型描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 布尔
    Bool,
    /// 整数
    Int,
    /// 字符串
    Str,
    /// 按成员名解析的枚举
    Enum(&'static EnumDescriptor),
    /// 依次尝试的候选类型
    OneOf(&'static [FieldType]),
    /// 非空列表
    ListOf(&'static FieldType),
    /// 以字符串为键的映射
    MapOf(&'static FieldType),
    /// 可留空（键缺失即留空）
    Blankable(&'static FieldType),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Str => f.write_str("str"),
            FieldType::Enum(descriptor) => write!(f, "{}", descriptor.name),
            FieldType::OneOf(options) => {
                let names: Vec<String> = options.iter().map(|t| t.to_string()).collect();
                write!(f, "Union[{}]", names.join(", "))
            }
            FieldType::ListOf(inner) => write!(f, "List[{inner}]"),
            FieldType::MapOf(inner) => write!(f, "Dict[str, {inner}]"),
            FieldType::Blankable(inner) => write!(f, "Optional[{inner}]"),
        }
    }
}

/// 字段声明
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// 文件中的键名
    pub key: &'static str,
    /// 字段类型
    pub ty: FieldType,
}
